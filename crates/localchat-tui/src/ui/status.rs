//! Status bar
//!
//! Displays the server, connection state, who is typing and the latest
//! notice.

use localchat_app::{App, ViewState};
use localchat_client::ConnectionState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, view: &ViewState, area: Rect) {
    let state = app.connection_state();
    let style = match state {
        ConnectionState::Connecting | ConnectionState::Closing => {
            Style::default().fg(Color::Yellow)
        },
        ConnectionState::Authenticated | ConnectionState::Streaming => {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        },
        ConnectionState::Closed => Style::default().fg(Color::Red),
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(state_label(state), style),
        Span::raw(" "),
        Span::raw(details(app, view)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Plain text of the status bar.
pub fn status_text(app: &App, view: &ViewState) -> String {
    format!(" {} {}", state_label(app.connection_state()), details(app, view))
}

fn state_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connecting => "Connecting...",
        ConnectionState::Authenticated => "Connected",
        ConnectionState::Streaming => "Online",
        ConnectionState::Closing => "Closing...",
        ConnectionState::Closed => "Disconnected",
    }
}

fn details(app: &App, view: &ViewState) -> String {
    let mut parts = vec![app.server_url().to_string()];
    if !view.status_label.is_empty() {
        parts.push(view.status_label.clone());
    }
    if let Some(message) = app.status_message().or(view.notice.as_deref()) {
        parts.push(message.to_string());
    }
    format!("| {}", parts.join(" | "))
}
