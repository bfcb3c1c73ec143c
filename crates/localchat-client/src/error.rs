//! Error types for the client engine.

use localchat_proto::ProtocolError;
use thiserror::Error;

use crate::dispatcher::ConnectionState;

/// Errors from the engine's state machine and builders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Invalid state transition attempted
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred
        state: ConnectionState,
        /// Operation that was attempted
        operation: String,
    },

    /// Wire decode or encode failure
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A settings value failed its format check
    #[error("invalid {field}: {value:?}")]
    Validation {
        /// Setting being changed
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// Socket failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ClientError {
    /// Whether the session cannot continue.
    ///
    /// Only a failure to establish the connection ends the process. Every
    /// other error drops one message or one request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Connect(_)))
    }
}

/// Socket and channel failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not open the WebSocket
    #[error("connection failed: {0}")]
    Connect(String),

    /// Reading a frame failed
    #[error("read failed: {0}")]
    Read(String),

    /// Writing a frame failed
    #[error("write failed: {0}")]
    Write(String),

    /// The writer task is gone
    #[error("connection closed")]
    Closed,
}
