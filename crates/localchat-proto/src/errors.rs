//! Protocol decoding and encoding errors.

use thiserror::Error;

use crate::PayloadType;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding or encoding wire messages.
///
/// None of these are fatal to a session. A message that fails to decode is
/// dropped and the read loop moves on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input is not a JSON object with an integer `payloadType`
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Tag is an integer but not one of the known payload types
    #[error("unknown payload type: {0}")]
    UnknownPayloadType(i64),

    /// Tag is known but the body does not match its shape
    #[error("malformed {payload_type} body: {reason}")]
    MalformedBody {
        /// Tag of the envelope being decoded
        payload_type: PayloadType,
        /// Parser diagnostic
        reason: String,
    },

    /// Message content is not valid base64
    #[error("invalid base64 content: {0}")]
    InvalidBase64(String),

    /// Message content is empty
    #[error("empty content")]
    EmptyContent,

    /// Payload could not be serialized
    #[error("encode failed: {0}")]
    Encode(String),
}

impl ProtocolError {
    /// Whether this error came from a known tag with a bad body.
    ///
    /// These are worth surfacing to the user. Unknown tags and bad envelopes
    /// are only logged.
    pub fn is_malformed_body(&self) -> bool {
        matches!(self, Self::MalformedBody { .. })
    }
}
