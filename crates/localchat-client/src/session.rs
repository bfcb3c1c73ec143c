//! Shared client session state.
//!
//! The read loop and the input path both need the caches. They share one
//! [`Session`] behind an `Arc`. Every method takes the lock once, does its
//! cache work and releases it before returning, so the lock is never held
//! across I/O.

use std::{
    ops::Sub,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use localchat_proto::payloads::roster::ClientRecord;

use crate::{
    message_cache::{MessageCache, MessageRecord},
    render::ChatLine,
    roster::RosterCache,
    typing::{TypingSet, typing_label},
};

#[derive(Debug)]
struct SessionState<I> {
    messages: MessageCache,
    roster: RosterCache,
    typing: TypingSet<I>,
}

impl<I> SessionState<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    fn typing_label(&mut self) -> String {
        let ids: Vec<String> = self.typing.ids().map(str::to_owned).collect();
        let names: Vec<String> = ids.iter().map(|id| self.roster.username_for(id)).collect();
        typing_label(&names)
    }
}

/// Message cache, roster cache and typing set under one lock.
#[derive(Debug)]
pub struct Session<I> {
    own_id: String,
    state: Mutex<SessionState<I>>,
}

impl<I> Session<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Empty session for the client identified by `own_id`.
    pub fn new(own_id: impl Into<String>) -> Self {
        let own_id = own_id.into();
        Self {
            state: Mutex::new(SessionState {
                messages: MessageCache::new(),
                roster: RosterCache::new(own_id.clone()),
                typing: TypingSet::new(),
            }),
            own_id,
        }
    }

    // Cache mutations are never observable half-done, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, SessionState<I>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// This client's id.
    pub fn own_id(&self) -> &str {
        &self.own_id
    }

    /// Append a message and render it.
    pub fn append_message(&self, record: MessageRecord) -> ChatLine {
        let mut state = self.lock();
        let index = state.messages.len();
        let line = ChatLine::compose(index, &record, &mut state.roster);
        state.messages.append(record);
        line
    }

    /// Replace the whole history and render every message.
    ///
    /// Indices restart at 0.
    pub fn replace_history(&self, records: Vec<MessageRecord>) -> Vec<ChatLine> {
        let mut state = self.lock();
        let SessionState { messages, roster, .. } = &mut *state;
        messages.reset();

        records
            .into_iter()
            .map(|record| {
                let line = ChatLine::compose(messages.len(), &record, roster);
                messages.append(record);
                line
            })
            .collect()
    }

    /// Copy of the message at a display index.
    pub fn message_at(&self, index: usize) -> Option<MessageRecord> {
        self.lock().messages.get(index).cloned()
    }

    /// Number of cached messages.
    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    /// Swap in a new roster.
    pub fn replace_roster(&self, clients: Vec<ClientRecord>) {
        self.lock().roster.replace(clients);
    }

    /// Username for a client id, never failing.
    pub fn username_for(&self, id: &str) -> String {
        self.lock().roster.username_for(id)
    }

    /// Color for a client id, never failing.
    pub fn color_for(&self, id: &str) -> String {
        self.lock().roster.color_for(id)
    }

    /// This client's record from the current roster.
    pub fn own_record(&self) -> Option<ClientRecord> {
        self.lock().roster.own_record().cloned()
    }

    /// Apply a typing indicator and return the new label.
    pub fn set_typing(&self, id: &str, is_typing: bool, now: I) -> String {
        let mut state = self.lock();
        if is_typing {
            state.typing.add(id, now);
        } else {
            state.typing.remove(id);
        }
        state.typing_label()
    }

    /// Drop stale typing entries. Returns the new label if anything changed.
    pub fn expire_typing(&self, now: I, ttl: Duration) -> Option<String> {
        let mut state = self.lock();
        if state.typing.expire(now, ttl) { Some(state.typing_label()) } else { None }
    }

    /// Hand the current typing label to `publish` without releasing the
    /// lock in between.
    ///
    /// Publishers that all go through here can never leave an older label
    /// on screen after a newer one.
    pub fn publish_typing_label(&self, publish: impl FnOnce(String)) {
        let mut state = self.lock();
        publish(state.typing_label());
    }

    /// Current typing label.
    pub fn typing_label(&self) -> String {
        self.lock().typing_label()
    }

    /// Ids currently typing, in start order.
    pub fn typing_ids(&self) -> Vec<String> {
        self.lock().typing.ids().map(str::to_owned).collect()
    }
}
