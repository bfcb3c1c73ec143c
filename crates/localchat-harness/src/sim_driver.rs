//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`localchat_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use localchat_app::{App, AppEvent, Driver, KeyInput, ViewState};
use localchat_client::ConnectionState;

/// Interval between ticks when no input is queued.
const TICK: Duration = Duration::from_millis(100);

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What one render call would have drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Connection state shown in the status bar.
    pub connection: ConnectionState,
    /// Input line.
    pub input: String,
    /// Input box title.
    pub mode_label: &'static str,
    /// Chat lines, rendered.
    pub lines: Vec<String>,
    /// Typing label.
    pub typing: String,
    /// Status message, if any.
    pub status: Option<String>,
}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    frames: Vec<RenderedFrame>,
    stopped: bool,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`localchat_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
/// Queued events are delivered first; with nothing queued the driver sleeps
/// one tick and reports no input.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
}

/// Test-side handle to a [`SimDriver`] owned by a runtime.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())) }
    }

    /// Handle for injecting input and reading frames while the driver runs.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state) }
    }
}

impl SimHandle {
    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        lock(&self.state).pending_events.push_back(event);
    }

    /// Inject one key press.
    pub fn press(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Type `text` and press Enter.
    pub fn type_line(&self, text: &str) {
        text.chars().for_each(|c| self.press(KeyInput::Char(c)));
        self.press(KeyInput::Enter);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !lock(&self.state).pending_events.is_empty()
    }

    /// Every frame rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        lock(&self.state).frames.clone()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        lock(&self.state).frames.last().cloned()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        lock(&self.state).stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let event = lock(&self.state).pending_events.pop_front();
        if event.is_none() {
            tokio::time::sleep(TICK).await;
        }
        Ok(event)
    }

    fn render(&mut self, app: &App, view: &ViewState) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if state.stopped {
            return Err(SimDriverError("render after stop".to_string()));
        }
        state.frames.push(RenderedFrame {
            connection: app.connection_state(),
            input: app.input().buffer().to_string(),
            mode_label: app.input_mode().label(),
            lines: view.lines.iter().map(ToString::to_string).collect(),
            typing: view.status_label.clone(),
            status: app.status_message().map(str::to_string),
        });
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.state).stopped = true;
    }
}
