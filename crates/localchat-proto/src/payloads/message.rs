//! Chat message payloads: messages, history lists, quotes and reactions.

use serde::{Deserialize, Serialize};

/// Sender reference inside a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    /// Sender's stable client id
    #[serde(default)]
    pub client_db_id: String,
}

/// Core message fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// Durable message id assigned by the sender
    #[serde(default)]
    pub message_db_id: String,
    /// Base64-encoded text
    #[serde(default)]
    pub message_context: String,
    /// Local send time, `HH:MM`
    #[serde(default)]
    pub message_time: String,
    /// Local send date, `YYYY-MM-DD`
    #[serde(default)]
    pub message_date: String,
    /// Message was deleted by its author
    #[serde(default)]
    pub deleted: bool,
    /// Message was edited after sending
    #[serde(default)]
    pub edited: bool,
}

/// Snapshot of a quoted message, captured when the quote was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    /// Quoted message's durable id
    #[serde(default)]
    pub quote_db_id: String,
    /// Quoted message's sender id
    #[serde(default)]
    pub quote_client_id: String,
    /// Quoted text, base64-encoded
    #[serde(default)]
    pub quote_message_context: String,
    /// Quoted message's send time
    #[serde(default)]
    pub quote_time: String,
    /// Quoted message's send date
    #[serde(default)]
    pub quote_date: String,
}

/// Reaction attached to a message in history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionBody {
    /// Message the reaction belongs to
    #[serde(default)]
    pub reaction_message_id: String,
    /// Reaction text, sent as-is
    #[serde(default)]
    pub reaction_context: String,
    /// Client that reacted
    #[serde(default)]
    pub reaction_client_id: String,
}

/// Image attachment. Carried through, never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    /// Image id
    #[serde(default)]
    pub image_db_id: String,
    /// MIME-ish type label
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Encoded image data
    #[serde(default)]
    pub data: String,
}

/// A single chat message (tag 1), also the entry shape of a history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Message fields
    pub message_type: MessageBody,
    /// Sender
    pub client_type: ClientRef,
    /// Quoted message, if this message is a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_type: Option<QuoteBody>,
    /// Reactions collected so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_type: Option<Vec<ReactionBody>>,
    /// Image attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageBody>,
}

/// Full message history (tag 4, inbound).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    /// Messages in display order
    pub message_list: Vec<MessagePayload>,
}

/// Reaction to a message (tag 7, outbound).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    /// Fresh id for this reaction
    #[serde(default)]
    pub reaction_db_id: String,
    /// Durable id of the message reacted to
    pub reaction_message_id: String,
    /// Reaction text
    #[serde(default)]
    pub reaction_context: String,
    /// Reacting client
    #[serde(default)]
    pub reaction_client_id: String,
}
