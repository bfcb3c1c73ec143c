//! Rendered chat lines.
//!
//! A [`ChatLine`] is a message with names and colors already resolved, so the
//! surface can draw it without touching the session.

use std::fmt;

use crate::{message_cache::MessageRecord, roster::RosterCache};

/// Indent for quote and reaction blocks, lining up with the message text.
pub const BLOCK_MARGIN: &str = "            ";

/// One message as shown in the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Display index used by inline references
    pub index: usize,
    /// Send time
    pub time: String,
    /// Sender's username
    pub username: String,
    /// Sender's color token
    pub color: String,
    /// Message text
    pub content: String,
    /// Quoted message shown above the line
    pub quote: Option<QuoteLine>,
    /// Reactions shown below the line
    pub reactions: Vec<String>,
}

/// Quote block above a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    /// Quoted send time
    pub time: String,
    /// Quoted sender's username
    pub username: String,
    /// Quoted text
    pub content: String,
}

impl ChatLine {
    pub(crate) fn compose(index: usize, record: &MessageRecord, roster: &mut RosterCache) -> Self {
        Self {
            index,
            time: record.sent_time.clone(),
            username: roster.username_for(&record.sender_id),
            color: roster.color_for(&record.sender_id),
            content: record.content.clone(),
            quote: record.quote.as_ref().map(|q| QuoteLine {
                time: q.time.clone(),
                username: roster.username_for(&q.sender_id),
                content: q.content.clone(),
            }),
            reactions: record.reactions.iter().map(|r| r.content.clone()).collect(),
        }
    }

    /// `[NNN]` prefix.
    pub fn index_label(&self) -> String {
        format!("[{:03}]", self.index)
    }

    /// Quote block text, without the trailing newline.
    pub fn quote_block(&self) -> Option<String> {
        self.quote
            .as_ref()
            .map(|q| format!("{BLOCK_MARGIN}┌ [{} - {}: {}]", q.time, q.username, q.content))
    }

    /// Reaction block text.
    pub fn reaction_block(&self) -> Option<String> {
        if self.reactions.is_empty() {
            return None;
        }
        Some(format!("{BLOCK_MARGIN}└ [ {} ]", self.reactions.join(" ")))
    }
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quote) = self.quote_block() {
            writeln!(f, "{quote}")?;
        }
        write!(f, "{} {} - {}: {}", self.index_label(), self.time, self.username, self.content)?;
        if let Some(reactions) = self.reaction_block() {
            write!(f, "\n{reactions}")?;
        }
        Ok(())
    }
}
