//! Session message history indexed by display position.
//!
//! The display index is what users type to quote or react (`/q007`). It is
//! local to the current history load: a full reload starts again at 0. The
//! durable `db_id` is what goes on the wire.

use localchat_proto::{
    ProtocolError,
    content::decode_content,
    payloads::message::{MessagePayload, QuoteBody},
};

/// A decoded chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRecord {
    /// Durable message id
    pub db_id: String,
    /// Sender's client id
    pub sender_id: String,
    /// Decoded text
    pub content: String,
    /// Send time, `HH:MM`
    pub sent_time: String,
    /// Send date, `YYYY-MM-DD`
    pub sent_date: String,
    /// Quoted message snapshot
    pub quote: Option<Quote>,
    /// Reactions in arrival order
    pub reactions: Vec<Reaction>,
}

/// Copy of a quoted message taken when the quote was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quote {
    /// Quoted message's durable id
    pub db_id: String,
    /// Quoted message's sender
    pub sender_id: String,
    /// Quoted text
    pub content: String,
    /// Quoted send time
    pub time: String,
    /// Quoted send date
    pub date: String,
}

/// A reaction on a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Reacting client
    pub reactor_id: String,
    /// Reaction text
    pub content: String,
}

impl From<&MessagePayload> for MessageRecord {
    fn from(payload: &MessagePayload) -> Self {
        let body = &payload.message_type;

        Self {
            db_id: body.message_db_id.clone(),
            sender_id: payload.client_type.client_db_id.clone(),
            content: decode_or_empty(&body.message_context, &body.message_db_id),
            sent_time: body.message_time.clone(),
            sent_date: body.message_date.clone(),
            quote: payload.quote_type.as_ref().and_then(quote_from_body),
            reactions: payload
                .reaction_type
                .iter()
                .flatten()
                .map(|r| Reaction {
                    reactor_id: r.reaction_client_id.clone(),
                    content: r.reaction_context.clone(),
                })
                .collect(),
        }
    }
}

// A quote without a quoted sender is how the server says "no quote".
fn quote_from_body(body: &QuoteBody) -> Option<Quote> {
    if body.quote_client_id.is_empty() {
        return None;
    }

    Some(Quote {
        db_id: body.quote_db_id.clone(),
        sender_id: body.quote_client_id.clone(),
        content: decode_or_empty(&body.quote_message_context, &body.quote_db_id),
        time: body.quote_time.clone(),
        date: body.quote_date.clone(),
    })
}

fn decode_or_empty(encoded: &str, db_id: &str) -> String {
    match decode_content(encoded) {
        Ok(text) => text,
        Err(ProtocolError::EmptyContent) => String::new(),
        Err(e) => {
            tracing::warn!(db_id, "undecodable message content: {e}");
            String::new()
        },
    }
}

/// Dense, append-only message history.
#[derive(Debug, Clone, Default)]
pub struct MessageCache {
    entries: Vec<MessageRecord>,
}

impl MessageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record and return its display index.
    pub fn append(&mut self, record: MessageRecord) -> usize {
        self.entries.push(record);
        self.entries.len() - 1
    }

    /// Record at a display index, `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&MessageRecord> {
        self.entries.get(index)
    }

    /// Drop all records. The next append gets index 0.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use localchat_proto::payloads::message::{ClientRef, MessageBody, ReactionBody};

    use super::*;

    fn record(db_id: &str) -> MessageRecord {
        MessageRecord { db_id: db_id.into(), ..MessageRecord::default() }
    }

    #[test]
    fn indices_are_dense_from_zero() {
        let mut cache = MessageCache::new();
        assert_eq!(cache.append(record("a")), 0);
        assert_eq!(cache.append(record("b")), 1);
        assert_eq!(cache.append(record("c")), 2);
        assert_eq!(cache.get(1).map(|r| r.db_id.as_str()), Some("b"));
    }

    #[test]
    fn out_of_range_is_none() {
        let mut cache = MessageCache::new();
        cache.append(record("a"));
        assert!(cache.get(1).is_none());
        assert!(cache.get(999).is_none());
    }

    #[test]
    fn reset_restarts_at_zero() {
        let mut cache = MessageCache::new();
        cache.append(record("a"));
        cache.append(record("b"));
        cache.reset();

        assert!(cache.is_empty());
        assert_eq!(cache.append(record("c")), 0);
        assert_eq!(cache.get(0).map(|r| r.db_id.as_str()), Some("c"));
    }

    #[test]
    fn record_from_payload_decodes_content() {
        let payload = MessagePayload {
            message_type: MessageBody {
                message_db_id: "m1".into(),
                message_context: "aGVsbG8=".into(),
                message_time: "10:30".into(),
                message_date: "2024-05-01".into(),
                ..MessageBody::default()
            },
            client_type: ClientRef { client_db_id: "alice".into() },
            quote_type: Some(QuoteBody {
                quote_db_id: "m0".into(),
                quote_client_id: "bob".into(),
                quote_message_context: "ZWFybGllcg==".into(),
                quote_time: "10:29".into(),
                quote_date: "2024-05-01".into(),
            }),
            reaction_type: Some(vec![ReactionBody {
                reaction_message_id: "m1".into(),
                reaction_context: "nice".into(),
                reaction_client_id: "carol".into(),
            }]),
            image_type: None,
        };

        let record = MessageRecord::from(&payload);

        assert_eq!(record.content, "hello");
        assert_eq!(record.sender_id, "alice");
        let quote = record.quote.unwrap();
        assert_eq!(quote.content, "earlier");
        assert_eq!(quote.sender_id, "bob");
        assert_eq!(record.reactions, vec![Reaction {
            reactor_id: "carol".into(),
            content: "nice".into()
        }]);
    }

    #[test]
    fn empty_quote_sender_means_no_quote() {
        let payload = MessagePayload {
            quote_type: Some(QuoteBody { quote_db_id: "x".into(), ..QuoteBody::default() }),
            ..MessagePayload::default()
        };
        assert!(MessageRecord::from(&payload).quote.is_none());
    }

    #[test]
    fn bad_content_degrades_to_empty() {
        let payload = MessagePayload {
            message_type: MessageBody { message_context: "%%%".into(), ..MessageBody::default() },
            ..MessagePayload::default()
        };
        assert_eq!(MessageRecord::from(&payload).content, "");
    }
}
