//! Typing indicator aggregation.
//!
//! A client that disconnects mid-sentence never sends "stopped typing", so
//! entries also expire [`TYPING_EXPIRY`] after their last "started typing".

use std::{ops::Sub, time::Duration};

/// How long a typing entry survives without a refresh.
pub const TYPING_EXPIRY: Duration = Duration::from_secs(10);

/// Clients currently typing, in the order they started.
#[derive(Debug, Clone)]
pub struct TypingSet<I> {
    entries: Vec<(String, I)>,
}

impl<I> Default for TypingSet<I> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<I> TypingSet<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as typing at `now`.
    ///
    /// Returns `true` if the id was not already present. A repeat refreshes
    /// the timestamp without reordering.
    pub fn add(&mut self, id: &str, now: I) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| existing == id) {
            entry.1 = now;
            return false;
        }

        self.entries.push((id.to_owned(), now));
        true
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| existing != id);
        self.entries.len() != before
    }

    /// Drop entries last refreshed more than `ttl` before `now`.
    ///
    /// Returns `true` if anything was dropped.
    pub fn expire(&mut self, now: I, ttl: Duration) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(_, since)| now < *since || now - *since <= ttl);
        self.entries.len() != before
    }

    /// Typing ids in start order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Whether `id` is typing.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == id)
    }

    /// Number of typing clients.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is typing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human label for a list of typing usernames.
///
/// `""`, `"alice is typing..."`, `"alice and bob are typing..."`,
/// `"alice, bob and carol are typing..."`.
pub fn typing_label(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => format!("{one} is typing..."),
        [init @ .., last] => format!("{} and {last} are typing...", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn labels() {
        assert_eq!(typing_label(&[]), "");
        assert_eq!(typing_label(&names(&["alice"])), "alice is typing...");
        assert_eq!(typing_label(&names(&["alice", "bob"])), "alice and bob are typing...");
        assert_eq!(
            typing_label(&names(&["alice", "bob", "carol"])),
            "alice, bob and carol are typing..."
        );
    }

    #[test]
    fn add_is_idempotent() {
        let mut set = TypingSet::new();
        assert!(set.add("a", Duration::from_secs(0)));
        assert!(!set.add("a", Duration::from_secs(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_only_named_id() {
        let mut set = TypingSet::new();
        set.add("a", Duration::ZERO);
        set.add("b", Duration::ZERO);

        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut set = TypingSet::new();
        set.add("a", Duration::from_secs(0));
        set.add("b", Duration::from_secs(5));

        assert!(!set.expire(Duration::from_secs(10), TYPING_EXPIRY));
        assert!(set.expire(Duration::from_secs(11), TYPING_EXPIRY));
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn refresh_extends_lifetime() {
        let mut set = TypingSet::new();
        set.add("a", Duration::from_secs(0));
        set.add("a", Duration::from_secs(8));

        assert!(!set.expire(Duration::from_secs(15), TYPING_EXPIRY));
        assert!(set.contains("a"));
    }
}
