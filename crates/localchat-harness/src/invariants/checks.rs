//! The checks in [`InvariantRegistry::standard`](super::InvariantRegistry::standard).

use std::collections::HashSet;

use localchat_client::{ConnectionState, Outgoing, typing_label};

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Shown message indices are `0, 1, .., n-1` in order.
///
/// Inline references name messages by these indices, so a gap or repeat
/// would make a quote or reaction point at the wrong message.
pub struct DenseIndices;

impl Invariant for DenseIndices {
    fn name(&self) -> &'static str {
        "dense_indices"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (position, index) in state.shown_indices.iter().enumerate() {
            if *index != position {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "line {position} shows index {index}: {:?}",
                        state.shown_indices
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The chat view shows exactly one line per cached message.
pub struct ViewMatchesCache;

impl Invariant for ViewMatchesCache {
    fn name(&self) -> &'static str {
        "view_matches_cache"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if state.shown_indices.len() == state.message_count {
            return Ok(());
        }
        Err(Violation {
            invariant: self.name(),
            message: format!(
                "{} lines shown for {} cached messages",
                state.shown_indices.len(),
                state.message_count
            ),
        })
    }
}

/// A client id appears in the typing set at most once.
pub struct UniqueTypists;

impl Invariant for UniqueTypists {
    fn name(&self) -> &'static str {
        "unique_typists"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for id in &state.typing_ids {
            if !seen.insert(id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{id} is typing twice: {:?}", state.typing_ids),
                });
            }
        }
        Ok(())
    }
}

/// The status bar's typing label names exactly the current typists.
pub struct TypingLabelMatches;

impl Invariant for TypingLabelMatches {
    fn name(&self) -> &'static str {
        "typing_label_matches"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let expected = typing_label(&state.typing_names);
        if state.typing_label == expected {
            return Ok(());
        }
        Err(Violation {
            invariant: self.name(),
            message: format!(
                "label {:?} but {:?} are typing",
                state.typing_label, state.typing_names
            ),
        })
    }
}

/// Connection state only moves forward.
pub struct LifecycleMonotonic;

fn rank(state: ConnectionState) -> u8 {
    match state {
        ConnectionState::Connecting => 0,
        ConnectionState::Authenticated => 1,
        ConnectionState::Streaming => 2,
        ConnectionState::Closing => 3,
        ConnectionState::Closed => 4,
    }
}

impl Invariant for LifecycleMonotonic {
    fn name(&self) -> &'static str {
        "lifecycle_monotonic"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for window in state.states.windows(2) {
            if rank(window[1]) < rank(window[0]) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("state moved back {:?} → {:?}", window[0], window[1]),
                });
            }
        }
        Ok(())
    }
}

/// Nothing is queued after a close frame, and at most one close is queued.
pub struct NothingAfterClose;

impl Invariant for NothingAfterClose {
    fn name(&self) -> &'static str {
        "nothing_after_close"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(close) = state.outgoing.iter().position(|o| *o == Outgoing::Close) else {
            return Ok(());
        };
        if let Some(late) = state.outgoing[close + 1..].first() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{late:?} queued after close"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use localchat_proto::Payload;

    use super::*;

    #[test]
    fn gap_in_indices_is_violation() {
        let snapshot = SystemSnapshot { shown_indices: vec![0, 2], ..SystemSnapshot::empty() };
        assert!(DenseIndices.check(&snapshot).is_err());
    }

    #[test]
    fn stale_view_is_violation() {
        let snapshot =
            SystemSnapshot { shown_indices: vec![0], message_count: 2, ..SystemSnapshot::empty() };
        assert!(ViewMatchesCache.check(&snapshot).is_err());
    }

    #[test]
    fn duplicate_typist_is_violation() {
        let snapshot =
            SystemSnapshot { typing_ids: vec!["a".into(), "a".into()], ..SystemSnapshot::empty() };
        assert!(UniqueTypists.check(&snapshot).is_err());
    }

    #[test]
    fn stale_typing_label_is_violation() {
        let snapshot = SystemSnapshot {
            typing_names: vec!["bob".into()],
            typing_label: "alice is typing...".into(),
            ..SystemSnapshot::empty()
        };
        assert!(TypingLabelMatches.check(&snapshot).is_err());

        let snapshot = SystemSnapshot {
            typing_names: vec!["bob".into()],
            typing_label: "bob is typing...".into(),
            ..SystemSnapshot::empty()
        };
        assert!(TypingLabelMatches.check(&snapshot).is_ok());
        assert!(TypingLabelMatches.check(&SystemSnapshot::empty()).is_ok());
    }

    #[test]
    fn reopening_is_violation() {
        let snapshot = SystemSnapshot {
            states: vec![
                ConnectionState::Streaming,
                ConnectionState::Closed,
                ConnectionState::Streaming,
            ],
            ..SystemSnapshot::empty()
        };
        assert!(LifecycleMonotonic.check(&snapshot).is_err());
    }

    #[test]
    fn send_after_close_is_violation() {
        let snapshot = SystemSnapshot {
            outgoing: vec![Outgoing::Close, Outgoing::Payload(Payload::MessageListRequest)],
            ..SystemSnapshot::empty()
        };
        assert!(NothingAfterClose.check(&snapshot).is_err());

        let snapshot = SystemSnapshot {
            outgoing: vec![Outgoing::Close, Outgoing::Close],
            ..SystemSnapshot::empty()
        };
        assert!(NothingAfterClose.check(&snapshot).is_err());
    }
}
