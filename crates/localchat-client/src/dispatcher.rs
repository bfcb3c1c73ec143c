//! Connection state machine and inbound dispatch.
//!
//! The dispatcher owns the lifecycle state and routes each decoded envelope
//! to the session caches. It performs no I/O: the read loop feeds it
//! [`ClientEvent`]s and executes the [`ClientAction`]s it returns.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐ Connected ┌───────────────┐ first frame ┌───────────┐
//! │ Connecting │──────────>│ Authenticated │────────────>│ Streaming │
//! └────────────┘           └───────────────┘             └───────────┘
//!       │                          │ shutdown / read error      │
//!       │                          ↓                            │
//!       │ shutdown            ┌─────────┐ <───────────────────────┘
//!       └────────────────────>│ Closing │
//!                             └─────────┘
//!                                  │ Disconnected
//!                                  ↓
//!                             ┌────────┐
//!                             │ Closed │
//!                             └────────┘
//! ```
//!
//! Inbound frames are handled one at a time in arrival order. A frame that
//! fails to decode is logged and dropped, never fatal.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use localchat_proto::{
    Envelope, Payload, PayloadType, ProtocolError,
    payloads::message::{MessageList, MessagePayload},
};

use crate::{
    env::Environment,
    error::ClientError,
    event::{ClientAction, ClientEvent, RenderCommand},
    message_cache::MessageRecord,
    outbound::OutboundBuilder,
    session::Session,
};

/// How long to wait for the peer to acknowledge our close frame.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket opening, nothing sent yet
    Connecting,
    /// Identity announced, no frame received yet
    Authenticated,
    /// Steady state, processing inbound frames
    Streaming,
    /// Close frame sent, waiting for the peer
    Closing,
    /// Session over
    Closed,
}

/// Protocol state machine for one connection.
pub struct Dispatcher<E: Environment> {
    env: E,
    session: Arc<Session<E::Instant>>,
    builder: OutboundBuilder<E>,
    state: ConnectionState,
}

impl<E: Environment> Dispatcher<E> {
    /// Create a dispatcher in [`ConnectionState::Connecting`].
    pub fn new(env: E, session: Arc<Session<E::Instant>>, builder: OutboundBuilder<E>) -> Self {
        Self { env, session, builder, state: ConnectionState::Connecting }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Shared session state.
    pub fn session(&self) -> &Arc<Session<E::Instant>> {
        &self.session
    }

    /// Process one event.
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidState` if the event is impossible in the current
    /// state (a frame before the handshake, a second handshake).
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Connected => self.on_connected(),
            ClientEvent::FrameReceived(raw) => self.on_frame(raw),
            ClientEvent::ShutdownRequested => Ok(self.begin_close("shutdown requested")),
            ClientEvent::ReadFailed { reason } => {
                tracing::error!("read failed: {reason}");
                Ok(self.begin_close("read failed"))
            },
            ClientEvent::Disconnected => {
                let previous = std::mem::replace(&mut self.state, ConnectionState::Closed);
                match previous {
                    ConnectionState::Closing | ConnectionState::Closed => Ok(vec![]),
                    // Peer went away first; the writer still needs releasing.
                    _ => {
                        tracing::info!("connection closed by peer from {previous:?}");
                        Ok(vec![ClientAction::Close])
                    },
                }
            },
        }
    }

    fn on_connected(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        if self.state != ConnectionState::Connecting {
            return Err(ClientError::InvalidState {
                state: self.state,
                operation: "announce identity".to_string(),
            });
        }

        self.state = ConnectionState::Authenticated;
        Ok(vec![ClientAction::Send(self.builder.authentication())])
    }

    fn on_frame(&mut self, raw: Bytes) -> Result<Vec<ClientAction>, ClientError> {
        match self.state {
            ConnectionState::Authenticated | ConnectionState::Streaming => {
                self.state = ConnectionState::Streaming;
                Ok(self.dispatch(raw))
            },
            // Frames racing our close frame are dropped.
            ConnectionState::Closing => Ok(vec![]),
            ConnectionState::Connecting | ConnectionState::Closed => {
                Err(ClientError::InvalidState {
                    state: self.state,
                    operation: "receive frame".to_string(),
                })
            },
        }
    }

    fn begin_close(&mut self, reason: &str) -> Vec<ClientAction> {
        match self.state {
            ConnectionState::Closing | ConnectionState::Closed => vec![],
            _ => {
                tracing::info!("closing connection: {reason}");
                self.state = ConnectionState::Closing;
                vec![ClientAction::Close]
            },
        }
    }

    fn dispatch(&mut self, raw: Bytes) -> Vec<ClientAction> {
        let envelope = match Envelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => return decode_failed(&e),
        };
        // Server-internal tags: the body is never read, so its shape is irrelevant.
        if let tag @ (PayloadType::Authentication
        | PayloadType::ProfileUpdate
        | PayloadType::ClientTyping) = envelope.payload_type()
        {
            tracing::debug!("ignoring inbound {tag}");
            return vec![];
        }
        let payload = match Payload::decode(&envelope) {
            Ok(payload) => payload,
            Err(e) => return decode_failed(&e),
        };

        match payload {
            Payload::Message(message) => self.on_message(&message),
            Payload::ClientList(list) => {
                self.session.replace_roster(list.clients);
                let mut actions = Vec::with_capacity(2);
                // Typing names resolve against the new roster.
                if !self.session.typing_ids().is_empty() {
                    let label = self.session.typing_label();
                    actions.push(ClientAction::Render(RenderCommand::SetStatusLabel(label)));
                }
                actions.push(ClientAction::Send(self.builder.history_request()));
                actions
            },
            Payload::MessageList(list) => self.on_message_list(&list),
            Payload::TypingIndicator(indicator) => {
                let label = self.session.set_typing(
                    &indicator.client_db_id,
                    indicator.is_typing,
                    self.env.now(),
                );
                vec![ClientAction::Render(RenderCommand::SetStatusLabel(label))]
            },
            // Reactions are not cached locally, so either meaning of tag 7
            // is answered with a fresh history.
            Payload::Reaction(_) | Payload::HistoryResync => {
                vec![ClientAction::Send(self.builder.history_request())]
            },
            other @ (Payload::Authentication(_)
            | Payload::ProfileUpdate(_)
            | Payload::ClientTyping(_)
            | Payload::ClientListRequest
            | Payload::MessageListRequest) => {
                tracing::debug!("ignoring inbound {}", other.payload_type());
                vec![]
            },
        }
    }

    fn on_message(&self, message: &MessagePayload) -> Vec<ClientAction> {
        let record = MessageRecord::from(message);
        let from_self = record.sender_id == self.session.own_id();
        let line = self.session.append_message(record);

        let mut actions = Vec::with_capacity(3);
        if !from_self {
            actions.push(ClientAction::Notify {
                title: format!("message from {}", line.username),
                message: line.content.clone(),
            });
        }
        actions.push(ClientAction::Render(RenderCommand::Append(line)));
        actions.push(ClientAction::Render(RenderCommand::ScrollToEnd));
        actions
    }

    fn on_message_list(&self, list: &MessageList) -> Vec<ClientAction> {
        let records = list.message_list.iter().map(MessageRecord::from).collect();
        let lines = self.session.replace_history(records);

        let mut actions = Vec::with_capacity(lines.len() + 2);
        actions.push(ClientAction::Render(RenderCommand::Clear));
        actions.extend(
            lines.into_iter().map(|line| ClientAction::Render(RenderCommand::Append(line))),
        );
        actions.push(ClientAction::Render(RenderCommand::ScrollToEnd));
        actions
    }
}

fn decode_failed(error: &ProtocolError) -> Vec<ClientAction> {
    match error {
        ProtocolError::MalformedBody { payload_type, .. } => {
            tracing::warn!("dropping frame: {error}");
            vec![ClientAction::Notify {
                title: "Error".to_string(),
                message: format!("Error parsing {payload_type} payload"),
            }]
        },
        ProtocolError::UnknownPayloadType(_) => {
            tracing::debug!("dropping frame: {error}");
            vec![]
        },
        _ => {
            tracing::warn!("dropping frame: {error}");
            vec![]
        },
    }
}
