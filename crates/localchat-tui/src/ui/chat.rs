//! Chat area
//!
//! Displays the message history with quote and reaction blocks.

use localchat_app::ViewState;
use localchat_client::ChatLine;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, view: &ViewState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" localchat ");

    let items = if view.lines.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        chat_items(view)
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len() - tail_fitting(&items, visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

/// One list item per message, dropping the `scroll_offset` newest.
pub fn chat_items(view: &ViewState) -> Vec<ListItem<'static>> {
    let shown = view.lines.len().saturating_sub(view.scroll_offset);
    view.lines[..shown].iter().map(message_item).collect()
}

// Number of trailing items whose rows fit in `height`.
fn tail_fitting(items: &[ListItem<'_>], height: usize) -> usize {
    let mut rows = 0;
    items
        .iter()
        .rev()
        .take_while(|item| {
            rows += item.height();
            rows <= height
        })
        .count()
}

fn message_item(line: &ChatLine) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut rows = Vec::with_capacity(3);

    if let Some(quote) = line.quote_block() {
        rows.push(Line::from(Span::styled(quote, dim)));
    }
    rows.push(Line::from(vec![
        Span::styled(line.index_label(), dim),
        Span::raw(" "),
        Span::styled(line.time.clone(), dim),
        Span::raw(" - "),
        Span::styled(
            line.username.clone(),
            Style::default().fg(parse_color(&line.color)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(": "),
        Span::raw(line.content.clone()),
    ]));
    if let Some(reactions) = line.reaction_block() {
        rows.push(Line::from(Span::styled(reactions, dim)));
    }

    ListItem::new(rows)
}

/// Terminal color for a roster color token.
///
/// Accepts `#rgb`, `#rrggbb` and ratatui color names. Anything else is
/// yellow.
pub fn parse_color(token: &str) -> Color {
    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Color::Yellow);
    }
    token.parse().unwrap_or(Color::Yellow)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits =
                hex.chars().map(|c| c.to_digit(16).and_then(|d| u8::try_from(d * 17).ok()));
            Some(Color::Rgb(digits.next()??, digits.next()??, digits.next()??))
        },
        6 if hex.is_ascii() => {
            Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))
        },
        _ => None,
    }
}
