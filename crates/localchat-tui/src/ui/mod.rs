//! UI rendering
//!
//! Rendering functions that convert App and view state into terminal output
//! using ratatui widgets. All functions are pure (no I/O).

mod chat;
mod input;
mod status;

use localchat_app::{App, ViewState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

pub use chat::{chat_items, parse_color};
pub use status::status_text;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, view: &ViewState) {
    const CHAT_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(CHAT_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [chat_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, view, *chat_area);
    input::render(frame, app, *input_area);
    status::render(frame, app, view, *status_area);
}
