//! Notification sink.

use thiserror::Error;

/// Notification delivery failure. Logged by the caller, never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receives user-facing notifications (new messages, decode failures).
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}
