//! What a client looks like from outside at one instant.

use localchat_client::{ConnectionState, Outgoing};

/// Snapshot of one client.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Messages in the session cache.
    pub message_count: usize,
    /// Indices of the lines in the chat view, top to bottom.
    pub shown_indices: Vec<usize>,
    /// Ids in the typing set.
    pub typing_ids: Vec<String>,
    /// Usernames of `typing_ids`, same order.
    pub typing_names: Vec<String>,
    /// Typing label shown in the status bar.
    pub typing_label: String,
    /// Every lifecycle state observed, oldest first.
    pub states: Vec<ConnectionState>,
    /// Everything queued for the socket writer, in order.
    pub outgoing: Vec<Outgoing>,
}

impl SystemSnapshot {
    /// A client that has seen nothing.
    pub fn empty() -> Self {
        Self::default()
    }
}
