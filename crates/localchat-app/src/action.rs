//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use localchat_client::InlineCommand;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Send a submitted line.
    Submit(InlineCommand),

    /// Scroll the chat view toward older messages.
    ScrollUp(usize),

    /// Scroll the chat view toward newer messages.
    ScrollDown(usize),
}
