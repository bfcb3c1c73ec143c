//! Tag-only first pass over inbound messages.
//!
//! The envelope knows which payload type a message claims to be and holds
//! the original bytes. Body fields are not touched until the dispatcher asks
//! for a concrete shape, so an envelope with an unknown or unwanted body costs
//! one small parse.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};

use crate::errors::{ProtocolError, Result};

/// Wire discriminant carried in every message's `payloadType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PayloadType {
    /// Identity announcement sent once after connecting
    Authentication = 0,
    /// A single chat message
    Message = 1,
    /// Full roster from the server, or a roster request
    ClientList = 2,
    /// Change of username, color or profile image
    ProfileUpdate = 3,
    /// Full history from the server, or a history request
    MessageList = 4,
    /// Another client started or stopped typing
    TypingIndicator = 5,
    /// This client's typing state, server-internal
    ClientTyping = 6,
    /// Reaction to a message, or a history resync request
    ///
    /// The same tag is used for both. Which one a message is depends on the
    /// fields present.
    ReactionOrHistoryRequest = 7,
}

impl PayloadType {
    /// All payload types in tag order.
    pub const ALL: [Self; 8] = [
        Self::Authentication,
        Self::Message,
        Self::ClientList,
        Self::ProfileUpdate,
        Self::MessageList,
        Self::TypingIndicator,
        Self::ClientTyping,
        Self::ReactionOrHistoryRequest,
    ];

    /// Numeric wire value.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for PayloadType {
    type Error = ProtocolError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Authentication),
            1 => Ok(Self::Message),
            2 => Ok(Self::ClientList),
            3 => Ok(Self::ProfileUpdate),
            4 => Ok(Self::MessageList),
            5 => Ok(Self::TypingIndicator),
            6 => Ok(Self::ClientTyping),
            7 => Ok(Self::ReactionOrHistoryRequest),
            other => Err(ProtocolError::UnknownPayloadType(other)),
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Serialize for PayloadType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_u8())
    }
}

impl<'de> Deserialize<'de> for PayloadType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Deserialize)]
struct TagOnly {
    #[serde(rename = "payloadType")]
    payload_type: i64,
}

/// A decoded tag plus the untouched message bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    payload_type: PayloadType,
    raw: Bytes,
}

impl Envelope {
    /// Read the `payloadType` tag from a raw message.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MalformedEnvelope` if the input is not a JSON object
    ///   or the tag is missing or not an integer
    /// - `ProtocolError::UnknownPayloadType` if the tag is outside 0-7
    pub fn decode(raw: impl Into<Bytes>) -> Result<Self> {
        let raw = raw.into();
        let tag: TagOnly = serde_json::from_slice(&raw)
            .map_err(|e| ProtocolError::MalformedEnvelope(e.to_string()))?;
        let payload_type = PayloadType::try_from(tag.payload_type)?;

        Ok(Self { payload_type, raw })
    }

    /// Tag read during the first pass.
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// Original message bytes.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Second-pass decode of the body into a concrete shape.
    ///
    /// # Errors
    ///
    /// `ProtocolError::MalformedBody` if the body does not match `T`.
    pub fn body<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.raw).map_err(|e| ProtocolError::MalformedBody {
            payload_type: self.payload_type,
            reason: e.to_string(),
        })
    }
}
