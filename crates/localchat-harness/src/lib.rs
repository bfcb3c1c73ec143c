//! Deterministic simulation harness for localchat testing.
//!
//! Seeded implementations of the client's collaborators so the production
//! read loop, dispatcher and runtime run unchanged under test:
//!
//! - [`SimEnv`]: virtual monotonic clock, fixed wall clock, seeded RNG
//! - [`SimDriver`]: scripted keys, recorded frames
//! - [`RecordingSurface`] and [`RecordingNotifier`]: capture what the read
//!   loop renders and raises
//! - [`ScriptedInbound`]: a peer that plays back frames, delays and errors
//! - [`SimClient`]: wires all of the above around one session
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the client
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod recording;
pub mod scenario;
pub mod sim_client;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    DenseIndices, Invariant, InvariantRegistry, InvariantResult, LifecycleMonotonic,
    NothingAfterClose, SystemSnapshot, TypingLabelMatches, UniqueTypists, ViewMatchesCache,
    Violation,
};
pub use recording::{RecordingNotifier, RecordingSurface, SurfaceCall};
pub use scenario::ScriptedInbound;
pub use sim_client::SimClient;
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimHandle};
pub use sim_env::SimEnv;
