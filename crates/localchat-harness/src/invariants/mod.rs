//! Session invariants.
//!
//! A check reads a [`SystemSnapshot`] (cache size, what the chat view shows,
//! who is typing, lifecycle history, queued frames) and reports a
//! [`Violation`] when the client has drifted into a state no frame sequence
//! should reach. Tests run the whole registry after every scripted step.
//!
//! ```ignore
//! let snapshot = client.snapshot(&states);
//! InvariantRegistry::standard().assert_all(&snapshot, "after history reload");
//! ```

use std::fmt;

mod checks;
mod snapshot;

pub use checks::{
    DenseIndices, LifecycleMonotonic, NothingAfterClose, TypingLabelMatches, UniqueTypists,
    ViewMatchesCache,
};
pub use snapshot::SystemSnapshot;

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A failed check.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Check that failed
    pub invariant: &'static str,
    /// What the snapshot showed
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of the client that holds after every step.
pub trait Invariant: Send + Sync {
    /// Short name used in violation reports.
    fn name(&self) -> &'static str;

    /// Inspect `state`.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Ordered set of checks.
#[derive(Default)]
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// No checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every client invariant:
    ///
    /// - [`DenseIndices`]
    /// - [`ViewMatchesCache`]
    /// - [`UniqueTypists`]
    /// - [`TypingLabelMatches`]
    /// - [`LifecycleMonotonic`]
    /// - [`NothingAfterClose`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(DenseIndices);
        registry.add(ViewMatchesCache);
        registry.add(UniqueTypists);
        registry.add(TypingLabelMatches);
        registry.add(LifecycleMonotonic);
        registry.add(NothingAfterClose);
        registry
    }

    /// Register `check`.
    pub fn add(&mut self, check: impl Invariant + 'static) {
        self.checks.push(Box::new(check));
    }

    /// Run every check. `Err` carries each violation, in registration order.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic listing all violations.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report: String = violations.iter().map(|v| format!("\n  {v}")).collect();
        panic!("{} invariant(s) broken {context}:{report}", violations.len());
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
