//! Terminal UI for localchat
//!
//! A thin shell over [`localchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`localchat_app::Runtime`]
//!
//! This crate handles terminal rendering plus the process concerns around it:
//! configuration, logging, the persisted identity and notifications.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod identity;
pub mod logging;
pub mod notify;
pub mod terminal;
pub mod ui;

pub use config::Config;
pub use identity::IdentityError;
pub use localchat_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use notify::StatusNotifier;
pub use terminal::{TerminalDriver, TerminalError};
