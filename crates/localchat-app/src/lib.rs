//! Application layer for localchat
//!
//! Pure state machines and generic runtime for UI and connection
//! orchestration, enabling deterministic simulation testing with the same
//! code that runs in production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (input editing, live command feedback, status)
//! - [`Bridge`]: turns submitted commands into outbound payloads
//! - [`ReadLoop`]: connection lifecycle, runs the dispatcher on inbound frames
//! - [`Surface`] and [`Notifier`]: collaborators the read loop writes to
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod connection;
mod driver;
mod event;
mod input;
mod notify;
mod runtime;
mod state;
mod surface;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use connection::{ReadLoop, Shutdown};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputState, KeyInput};
pub use notify::{Notifier, NotifyError};
pub use runtime::Runtime;
pub use state::ViewState;
pub use surface::{ChatView, Surface, apply_render, publish_typing_label};
