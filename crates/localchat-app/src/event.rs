//! Application input events.
//!
//! Events originate from user interaction (keyboard, resize), periodic
//! ticks, and lifecycle changes published by the read loop.

use localchat_client::ConnectionState;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The connection moved to a new lifecycle state.
    ConnectionChanged(ConnectionState),

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
