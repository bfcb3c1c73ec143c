//! JSON payload bodies and the `Payload` sum type.
//!
//! The tag travels inside the same JSON object as the body, so encoding
//! flattens the body next to a `payloadType` field and decoding reads the
//! tag first (see [`Envelope`]).
//!
//! # Shared tags
//!
//! Three tags carry two different message kinds depending on which fields
//! are present:
//!
//! - 2: a roster (`clients` present) or a bare roster request
//! - 4: a history list (`messageList` present) or a bare history request
//! - 7: a reaction (`reactionMessageId` present) or a bare history resync
//!   request
//!
//! Each kind is its own variant here, so callers never guess.

pub mod message;
pub mod roster;
pub mod session;

use serde::{Deserialize, Serialize, de::IgnoredAny};

use crate::{
    Envelope, PayloadType,
    errors::{ProtocolError, Result},
};

/// Every message kind on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Identity announcement
    Authentication(session::Authentication),
    /// Chat message
    Message(message::MessagePayload),
    /// Full roster
    ClientList(roster::ClientList),
    /// Bodiless roster request
    ClientListRequest,
    /// Profile change
    ProfileUpdate(roster::ProfileUpdate),
    /// Full history
    MessageList(message::MessageList),
    /// Bodiless history request
    MessageListRequest,
    /// Another client's typing state
    TypingIndicator(session::TypingIndicator),
    /// This client's typing state
    ClientTyping(session::TypingIndicator),
    /// Reaction to a message
    Reaction(message::ReactionPayload),
    /// Bodiless history resync request sharing the reaction tag
    HistoryResync,
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "payloadType")]
    payload_type: PayloadType,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct NoBody {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodyShape {
    clients: Option<IgnoredAny>,
    message_list: Option<IgnoredAny>,
    reaction_message_id: Option<IgnoredAny>,
}

impl Payload {
    /// Wire tag for this payload.
    pub const fn payload_type(&self) -> PayloadType {
        match self {
            Self::Authentication(_) => PayloadType::Authentication,
            Self::Message(_) => PayloadType::Message,
            Self::ClientList(_) | Self::ClientListRequest => PayloadType::ClientList,
            Self::ProfileUpdate(_) => PayloadType::ProfileUpdate,
            Self::MessageList(_) | Self::MessageListRequest => PayloadType::MessageList,
            Self::TypingIndicator(_) => PayloadType::TypingIndicator,
            Self::ClientTyping(_) => PayloadType::ClientTyping,
            Self::Reaction(_) | Self::HistoryResync => PayloadType::ReactionOrHistoryRequest,
        }
    }

    /// Serialize to a JSON text frame with the tag first.
    ///
    /// # Errors
    ///
    /// `ProtocolError::Encode` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let payload_type = self.payload_type();
        let encoded = match self {
            Self::Authentication(body) => tagged(payload_type, body),
            Self::Message(body) => tagged(payload_type, body),
            Self::ClientList(body) => tagged(payload_type, body),
            Self::ProfileUpdate(body) => tagged(payload_type, body),
            Self::MessageList(body) => tagged(payload_type, body),
            Self::TypingIndicator(body) | Self::ClientTyping(body) => tagged(payload_type, body),
            Self::Reaction(body) => tagged(payload_type, body),
            Self::ClientListRequest | Self::MessageListRequest | Self::HistoryResync => {
                tagged(payload_type, &NoBody {})
            },
        };

        encoded.map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Second-pass decode of an envelope into its concrete payload.
    ///
    /// # Errors
    ///
    /// `ProtocolError::MalformedBody` if the body does not match the tag.
    pub fn decode(envelope: &Envelope) -> Result<Self> {
        let payload = match envelope.payload_type() {
            PayloadType::Authentication => Self::Authentication(envelope.body()?),
            PayloadType::Message => Self::Message(envelope.body()?),
            PayloadType::ClientList => {
                if envelope.body::<BodyShape>()?.clients.is_some() {
                    Self::ClientList(envelope.body()?)
                } else {
                    Self::ClientListRequest
                }
            },
            PayloadType::ProfileUpdate => Self::ProfileUpdate(envelope.body()?),
            PayloadType::MessageList => {
                if envelope.body::<BodyShape>()?.message_list.is_some() {
                    Self::MessageList(envelope.body()?)
                } else {
                    Self::MessageListRequest
                }
            },
            PayloadType::TypingIndicator => Self::TypingIndicator(envelope.body()?),
            PayloadType::ClientTyping => Self::ClientTyping(envelope.body()?),
            PayloadType::ReactionOrHistoryRequest => {
                if envelope.body::<BodyShape>()?.reaction_message_id.is_some() {
                    Self::Reaction(envelope.body()?)
                } else {
                    Self::HistoryResync
                }
            },
        };

        Ok(payload)
    }
}

fn tagged<T: Serialize>(payload_type: PayloadType, body: &T) -> serde_json::Result<String> {
    serde_json::to_string(&Tagged { payload_type, body })
}
