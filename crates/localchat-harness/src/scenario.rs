//! Scripted peers and payload fixtures.
//!
//! [`ScriptedInbound`] plays the server side of the socket: frames, pauses,
//! read errors, and finally either a hang-up or silence. The fixture
//! functions build the inbound payloads scenarios are made of.

use std::time::Duration;

use bytes::Bytes;
use localchat_client::{Inbound, TransportError, inbound_channel};
use localchat_proto::{
    Payload,
    content::encode_content,
    payloads::{
        message::{ClientRef, MessageBody, MessageList, MessagePayload, QuoteBody, ReactionBody},
        roster::{ClientList, ClientRecord},
        session::TypingIndicator,
    },
};

#[derive(Debug, Clone)]
enum Step {
    Frame(Bytes),
    Fail(String),
    Wait(Duration),
}

/// Server side of a simulated connection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInbound {
    steps: Vec<Step>,
    hold_open: bool,
}

impl ScriptedInbound {
    /// Empty script. The peer hangs up immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send an encoded payload.
    #[must_use]
    pub fn payload(self, payload: &Payload) -> Self {
        match payload.encode() {
            Ok(text) => self.raw(&text),
            Err(e) => {
                tracing::error!("fixture does not encode: {e}");
                self
            },
        }
    }

    /// Send a raw text frame.
    #[must_use]
    pub fn raw(mut self, text: &str) -> Self {
        self.steps.push(Step::Frame(Bytes::copy_from_slice(text.as_bytes())));
        self
    }

    /// Pause before the next step.
    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Wait(duration));
        self
    }

    /// Fail the read with `reason`. Ends the script.
    #[must_use]
    pub fn fail(mut self, reason: &str) -> Self {
        self.steps.push(Step::Fail(reason.to_string()));
        self
    }

    /// Stay connected but silent after the last step, so a close is never
    /// acknowledged.
    #[must_use]
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Start playing the script on the current tokio runtime.
    pub fn start(self) -> Inbound {
        let (tx, inbound) = inbound_channel();
        tokio::spawn(async move {
            for step in self.steps {
                let sent = match step {
                    Step::Frame(raw) => tx.send(Ok(raw)).await,
                    Step::Fail(reason) => {
                        let _ = tx.send(Err(TransportError::Read(reason))).await;
                        return;
                    },
                    Step::Wait(duration) => {
                        tokio::time::sleep(duration).await;
                        Ok(())
                    },
                };
                if sent.is_err() {
                    return;
                }
            }
            if self.hold_open {
                tx.closed().await;
            }
        });
        inbound
    }
}

/// A chat message from `sender` with plaintext `text`.
pub fn message(id: &str, sender: &str, text: &str) -> MessagePayload {
    MessagePayload {
        message_type: MessageBody {
            message_db_id: id.to_string(),
            message_context: encode_content(text),
            message_time: "10:00".to_string(),
            message_date: "2024-01-01".to_string(),
            ..MessageBody::default()
        },
        client_type: ClientRef { client_db_id: sender.to_string() },
        ..MessagePayload::default()
    }
}

/// `message` quoting `quoted` and carrying `reactions`.
pub fn reply(
    mut message: MessagePayload,
    quoted: &MessagePayload,
    reactions: &[&str],
) -> MessagePayload {
    message.quote_type = Some(QuoteBody {
        quote_db_id: quoted.message_type.message_db_id.clone(),
        quote_client_id: quoted.client_type.client_db_id.clone(),
        quote_message_context: quoted.message_type.message_context.clone(),
        quote_time: quoted.message_type.message_time.clone(),
        quote_date: quoted.message_type.message_date.clone(),
    });
    message.reaction_type = Some(
        reactions
            .iter()
            .map(|r| ReactionBody {
                reaction_message_id: message.message_type.message_db_id.clone(),
                reaction_context: (*r).to_string(),
                reaction_client_id: "someone".to_string(),
            })
            .collect(),
    );
    message
}

/// Full history.
pub fn history(messages: Vec<MessagePayload>) -> Payload {
    Payload::MessageList(MessageList { message_list: messages })
}

/// Full roster from `(id, username, color)` triples.
pub fn roster(clients: &[(&str, &str, &str)]) -> Payload {
    Payload::ClientList(ClientList {
        clients: clients
            .iter()
            .map(|(id, name, color)| ClientRecord {
                client_db_id: (*id).to_string(),
                client_username: (*name).to_string(),
                client_color: (*color).to_string(),
                client_profile_image: String::new(),
            })
            .collect(),
    })
}

/// Typing state change for `id`.
pub fn typing(id: &str, is_typing: bool) -> Payload {
    Payload::TypingIndicator(TypingIndicator { client_db_id: id.to_string(), is_typing })
}
