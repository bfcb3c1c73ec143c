//! Observable chat view state.
//!
//! [`ViewState`] is the view model the read loop writes into (through
//! [`crate::Surface`]) and the driver draws from. It holds rendered lines,
//! not session records, so drawing never touches the session lock.

use localchat_client::ChatLine;

/// What the chat surface currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Rendered messages, oldest first.
    pub lines: Vec<ChatLine>,
    /// Typing label.
    pub status_label: String,
    /// Lines scrolled up from the newest message. 0 follows the tail.
    pub scroll_offset: usize,
    /// Transient notice from the notifier.
    pub notice: Option<String>,
}
