//! Outbound payload builder.
//!
//! Builds the fixed-shape requests this client sends. Builders are pure; the
//! caller hands the result to the [`Outbox`](crate::Outbox).

use std::{ops::Sub, time::Duration};

use localchat_proto::{
    Payload,
    content::encode_content,
    payloads::{
        message::{ClientRef, MessageBody, MessagePayload, QuoteBody, ReactionPayload},
        roster::{ClientRecord, ProfileUpdate},
        session::Authentication,
    },
};

use crate::{
    command::{InlineCommand, SettingsCommand, is_hex_color},
    env::Environment,
    error::ClientError,
    message_cache::MessageRecord,
    session::Session,
};

/// Builds payloads stamped with this client's identity and local time.
#[derive(Debug, Clone)]
pub struct OutboundBuilder<E: Environment> {
    env: E,
    own_id: String,
    username: String,
}

impl<E: Environment> OutboundBuilder<E> {
    /// Builder for the client `own_id` announcing itself as `username`.
    pub fn new(env: E, own_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self { env, own_id: own_id.into(), username: username.into() }
    }

    /// This client's id.
    pub fn own_id(&self) -> &str {
        &self.own_id
    }

    /// Identity announcement, sent once after connecting.
    pub fn authentication(&self) -> Payload {
        Payload::Authentication(Authentication {
            client_username: self.username.clone(),
            client_db_id: self.own_id.clone(),
        })
    }

    /// Bounded history resync request.
    pub fn history_request(&self) -> Payload {
        Payload::MessageListRequest
    }

    /// Plain message.
    pub fn plain(&self, text: &str) -> Payload {
        Payload::Message(self.message(text))
    }

    /// Reply carrying a snapshot of `referenced`.
    ///
    /// An empty `referenced` (stale index) yields an empty quote.
    pub fn quote(&self, text: &str, referenced: &MessageRecord) -> Payload {
        let mut message = self.message(text);
        message.quote_type = Some(QuoteBody {
            quote_db_id: referenced.db_id.clone(),
            quote_client_id: referenced.sender_id.clone(),
            quote_message_context: encode_content(&referenced.content),
            quote_time: referenced.sent_time.clone(),
            quote_date: referenced.sent_date.clone(),
        });
        Payload::Message(message)
    }

    /// Reaction to `referenced`.
    pub fn reaction(&self, reaction: &str, referenced: &MessageRecord) -> Payload {
        Payload::Reaction(ReactionPayload {
            reaction_db_id: self.env.reaction_id(),
            reaction_message_id: referenced.db_id.clone(),
            reaction_context: reaction.to_owned(),
            reaction_client_id: self.own_id.clone(),
        })
    }

    /// Profile update changing only the color.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` unless `color` is `#` plus 3 or 6 hex digits.
    pub fn profile_color(
        &self,
        own: Option<ClientRecord>,
        color: &str,
    ) -> Result<Payload, ClientError> {
        if !is_hex_color(color) {
            return Err(ClientError::Validation { field: "color", value: color.to_owned() });
        }

        let mut update = ProfileUpdate::from(self.own_or_fallback(own));
        update.client_color = color.to_owned();
        Ok(Payload::ProfileUpdate(update))
    }

    /// Profile update changing only the username.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` if `name` is blank.
    pub fn profile_name(
        &self,
        own: Option<ClientRecord>,
        name: &str,
    ) -> Result<Payload, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation { field: "username", value: name.to_owned() });
        }

        let mut update = ProfileUpdate::from(self.own_or_fallback(own));
        name.clone_into(&mut update.client_username);
        Ok(Payload::ProfileUpdate(update))
    }

    /// Build the payload for a submitted inline command.
    ///
    /// Quote and reaction indices resolve against the session's message
    /// cache. A stale index degrades to an empty reference.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` for a settings value that fails its check.
    pub fn build<I>(
        &self,
        command: &InlineCommand,
        session: &Session<I>,
    ) -> Result<Payload, ClientError>
    where
        I: Copy + Ord + Sub<Output = Duration>,
    {
        match command {
            InlineCommand::Plain { text } => Ok(self.plain(text)),
            InlineCommand::Quote { index, text } => Ok(self.quote(text, &resolve(session, *index))),
            InlineCommand::React { index, reaction } => {
                Ok(self.reaction(reaction, &resolve(session, *index)))
            },
            InlineCommand::Settings(SettingsCommand::Color { value }) => {
                self.profile_color(session.own_record(), value)
            },
            InlineCommand::Settings(SettingsCommand::Name { value }) => {
                self.profile_name(session.own_record(), value)
            },
        }
    }

    fn message(&self, text: &str) -> MessagePayload {
        let stamp = self.env.local_stamp();
        MessagePayload {
            message_type: MessageBody {
                message_db_id: self.env.message_id(),
                message_context: encode_content(text),
                message_time: stamp.time,
                message_date: stamp.date,
                ..MessageBody::default()
            },
            client_type: ClientRef { client_db_id: self.own_id.clone() },
            ..MessagePayload::default()
        }
    }

    fn own_or_fallback(&self, own: Option<ClientRecord>) -> ClientRecord {
        own.unwrap_or_else(|| ClientRecord {
            client_db_id: self.own_id.clone(),
            client_username: self.username.clone(),
            ..ClientRecord::default()
        })
    }
}

fn resolve<I>(session: &Session<I>, index: usize) -> MessageRecord
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    session.message_at(index).unwrap_or_else(|| {
        tracing::debug!(index, "reference to missing message");
        MessageRecord::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SystemEnv;

    fn builder() -> OutboundBuilder<SystemEnv> {
        OutboundBuilder::new(SystemEnv::new(), "me", "myself")
    }

    fn referenced() -> MessageRecord {
        MessageRecord {
            db_id: "m7".into(),
            sender_id: "a".into(),
            content: "hello".into(),
            sent_time: "09:00".into(),
            sent_date: "2024-01-01".into(),
            ..MessageRecord::default()
        }
    }

    #[test]
    fn plain_message_is_encoded_and_stamped() {
        let Payload::Message(message) = builder().plain("hi") else { panic!("expected message") };

        assert_eq!(message.message_type.message_context, "aGk=");
        assert_eq!(message.client_type.client_db_id, "me");
        assert!(message.message_type.message_db_id.starts_with("id-"));
        assert_eq!(message.message_type.message_time.len(), 5);
        assert!(message.quote_type.is_none());
    }

    #[test]
    fn quote_snapshots_reference() {
        let Payload::Message(message) = builder().quote("reply", &referenced()) else {
            panic!("expected message")
        };
        let quote = message.quote_type.unwrap();

        assert_eq!(quote.quote_db_id, "m7");
        assert_eq!(quote.quote_client_id, "a");
        assert_eq!(quote.quote_message_context, "aGVsbG8=");
        assert_eq!(quote.quote_time, "09:00");
    }

    #[test]
    fn reaction_targets_db_id() {
        let Payload::Reaction(reaction) = builder().reaction("+1", &referenced()) else {
            panic!("expected reaction")
        };

        assert_eq!(reaction.reaction_message_id, "m7");
        assert_eq!(reaction.reaction_context, "+1");
        assert_eq!(reaction.reaction_client_id, "me");
        assert_eq!(reaction.reaction_db_id.len(), 36);
    }

    #[test]
    fn profile_color_validates() {
        assert!(matches!(
            builder().profile_color(None, "red"),
            Err(ClientError::Validation { field: "color", .. })
        ));

        let Ok(Payload::ProfileUpdate(update)) = builder().profile_color(None, "#0af") else {
            panic!("expected profile update")
        };
        assert_eq!(update.client_db_id, "me");
        assert_eq!(update.client_username, "myself");
        assert_eq!(update.client_color, "#0af");
    }

    #[test]
    fn profile_keeps_roster_fields() {
        let own = ClientRecord {
            client_db_id: "me".into(),
            client_username: "roster-name".into(),
            client_color: "#111".into(),
            client_profile_image: "img".into(),
        };

        let Ok(Payload::ProfileUpdate(update)) = builder().profile_name(Some(own), " newname ")
        else {
            panic!("expected profile update")
        };
        assert_eq!(update.client_username, "newname");
        assert_eq!(update.client_color, "#111");
        assert_eq!(update.client_profile_image, "img");
    }

    #[test]
    fn build_resolves_stale_index_to_empty() {
        let session: Session<Duration> = Session::new("me");
        let payload = builder()
            .build(&InlineCommand::React { index: 3, reaction: "wow".into() }, &session)
            .unwrap();

        let Payload::Reaction(reaction) = payload else { panic!("expected reaction") };
        assert_eq!(reaction.reaction_message_id, "");
    }

    #[test]
    fn build_history_request_shape() {
        assert_eq!(builder().history_request().encode().unwrap(), r#"{"payloadType":4}"#);
        insta::assert_snapshot!(builder().authentication().encode().unwrap(), @r#"{"payloadType":0,"clientUsername":"myself","clientDbId":"me"}"#);
    }
}
