//! Dispatcher events and actions.

use bytes::Bytes;
use localchat_proto::Payload;

use crate::render::ChatLine;

/// Events the read loop feeds into the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// WebSocket handshake finished.
    Connected,

    /// One inbound text frame.
    FrameReceived(Bytes),

    /// User or OS asked to quit.
    ShutdownRequested,

    /// Reading from the socket failed.
    ReadFailed {
        /// Transport diagnostic
        reason: String,
    },

    /// The socket is gone: the peer acknowledged our close, closed first, or
    /// the close wait elapsed.
    Disconnected,
}

/// Actions the dispatcher asks the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Queue a payload on the outbox.
    Send(Payload),

    /// Update the chat surface.
    Render(RenderCommand),

    /// Raise a user notification.
    Notify {
        /// Notification title
        title: String,
        /// Notification body
        message: String,
    },

    /// Queue a close frame.
    Close,
}

/// Chat surface updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Append a rendered message.
    Append(ChatLine),
    /// Remove every rendered message.
    Clear,
    /// Follow the newest message.
    ScrollToEnd,
    /// Replace the status label (typing indicator).
    SetStatusLabel(String),
}
