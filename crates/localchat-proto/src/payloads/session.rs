//! Session payloads: identity announcement and typing state.

use serde::{Deserialize, Serialize};

/// One-shot identity announcement (tag 0, outbound).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    /// Username to announce
    pub client_username: String,
    /// This client's stable id
    pub client_db_id: String,
}

/// Typing state of one client (tags 5 and 6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicator {
    /// Client whose state changed
    pub client_db_id: String,
    /// Started (`true`) or stopped (`false`) typing
    pub is_typing: bool,
}
