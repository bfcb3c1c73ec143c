//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the input line and re-classifies it on every edit, so the input
//!   label tracks the command being typed.
//! - Parses the line on Enter and hands the command to the runtime.
//! - Stores terminal dimensions to size page scrolling.
//! - Tracks the connection lifecycle for the status bar.

use localchat_client::{
    ConnectionState, InputMode,
    command::{classify, parse},
};

use crate::{AppAction, AppEvent, InputState, KeyInput};

/// Rows taken by the input box and status bar.
const CHROME_ROWS: u16 = 4;

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Server URL, for display.
    server_url: String,
    /// Line being edited.
    input: InputState,
    /// What the current line will do on Enter.
    mode: InputMode,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App for the given server URL.
    pub fn new(server_url: String) -> Self {
        Self {
            state: ConnectionState::Connecting,
            server_url,
            input: InputState::new(),
            mode: InputMode::Message,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::ConnectionChanged(state) => {
                self.state = state;
                if state == ConnectionState::Closed {
                    self.status_message = Some("Disconnected".to_string());
                }
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc | KeyInput::Interrupt => return vec![AppAction::Quit],
            KeyInput::Enter => return self.submit(),
            KeyInput::Up => return vec![AppAction::ScrollUp(1), AppAction::Render],
            KeyInput::Down => return vec![AppAction::ScrollDown(1), AppAction::Render],
            KeyInput::PageUp => {
                return vec![AppAction::ScrollUp(self.page_rows()), AppAction::Render];
            },
            KeyInput::PageDown => {
                return vec![AppAction::ScrollDown(self.page_rows()), AppAction::Render];
            },
            KeyInput::Char(c) => self.input.insert(c),
            KeyInput::Backspace => self.input.backspace(),
            KeyInput::Delete => self.input.delete(),
            KeyInput::Left => self.input.move_left(),
            KeyInput::Right => self.input.move_right(),
            KeyInput::Home => self.input.move_home(),
            KeyInput::End => self.input.move_end(),
        }

        self.mode = classify(self.input.buffer());
        vec![AppAction::Render]
    }

    fn submit(&mut self) -> Vec<AppAction> {
        let text = self.input.take();
        self.mode = InputMode::Message;

        let Some(command) = parse(&text) else {
            return vec![AppAction::Render];
        };

        if !self.is_connected() {
            self.status_message = Some("Not connected".to_string());
            return vec![AppAction::Render];
        }

        self.status_message = None;
        vec![AppAction::Submit(command), AppAction::Render]
    }

    fn page_rows(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(CHROME_ROWS).max(1))
    }

    /// Whether submitted lines can be sent.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Authenticated | ConnectionState::Streaming)
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Line being edited.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Classification of the line being edited.
    pub fn input_mode(&self) -> InputMode {
        self.mode
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
