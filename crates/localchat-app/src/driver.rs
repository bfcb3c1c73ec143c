//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.
//!
//! The socket is not part of the driver: the read loop owns the inbound side
//! and the [`localchat_client::Outbox`] owns the outbound side.

use std::future::Future;

use crate::{App, AppEvent, ViewState};

/// Abstracts terminal I/O for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in production TUI and simulation.
///
/// # Implementations
///
/// - **TUI**: Uses crossterm for terminal events and ratatui for drawing
/// - **Simulation**: Replays scripted keys and records rendered frames
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns `None` if no event arrived before the driver's tick interval.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state and chat view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App, view: &ViewState) -> Result<(), Self::Error>;

    /// Restore the platform and release resources.
    fn stop(&mut self);
}
