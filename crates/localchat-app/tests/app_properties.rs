//! Property-based tests for the App state machine.
//!
//! Arbitrary key sequences must keep the input editor consistent with a
//! plain string model, and the input mode must always describe the text
//! currently in the buffer.

use localchat_app::{App, AppAction, AppEvent, KeyInput};
use localchat_client::{ConnectionState, command::classify};
use proptest::prelude::*;

/// Generate editing keys, biased toward characters that form prefixes.
fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        6 => prop::sample::select(vec![
            '[', ']', '0', '1', '>', ' ', '/', 'q', 'r', 's', 'c', 'n', '#', 'é', '👍'
        ])
        .prop_map(KeyInput::Char),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
    ]
}

/// Reference model: a char vector and a cursor.
fn apply_model(model: &mut Vec<char>, cursor: &mut usize, key: KeyInput) {
    match key {
        KeyInput::Char(c) => {
            model.insert(*cursor, c);
            *cursor += 1;
        },
        KeyInput::Backspace if *cursor > 0 => {
            *cursor -= 1;
            model.remove(*cursor);
        },
        KeyInput::Delete if *cursor < model.len() => {
            model.remove(*cursor);
        },
        KeyInput::Left => *cursor = cursor.saturating_sub(1),
        KeyInput::Right => *cursor = (*cursor + 1).min(model.len()),
        KeyInput::Home => *cursor = 0,
        KeyInput::End => *cursor = model.len(),
        _ => {},
    }
}

#[test]
fn prop_editor_matches_model() {
    proptest!(|(keys in prop::collection::vec(key_strategy(), 0..60))| {
        let mut app = App::new("ws://localhost:8080/chat".into());
        let mut model = Vec::new();
        let mut cursor = 0;

        for key in keys {
            let actions = app.handle(AppEvent::Key(key));
            apply_model(&mut model, &mut cursor, key);

            // PROPERTY: every edit asks for a redraw and nothing else
            prop_assert_eq!(actions, vec![AppAction::Render]);

            // PROPERTY: buffer and cursor follow the model
            let expected: String = model.iter().collect();
            prop_assert_eq!(app.input().buffer(), expected.as_str());
            prop_assert_eq!(app.input().cursor(), cursor);

            // PROPERTY: mode always reflects the current buffer
            prop_assert_eq!(app.input_mode(), classify(app.input().buffer()));
        }
    });
}

#[test]
fn prop_submit_only_when_connected() {
    let states = prop::sample::select(vec![
        ConnectionState::Connecting,
        ConnectionState::Authenticated,
        ConnectionState::Streaming,
        ConnectionState::Closing,
        ConnectionState::Closed,
    ]);

    proptest!(|(state in states, text in "[a-z]{1,20}")| {
        let mut app = App::new("ws://localhost:8080/chat".into());
        let _ = app.handle(AppEvent::ConnectionChanged(state));
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        let submitted = actions.iter().any(|a| matches!(a, AppAction::Submit(_)));

        // PROPERTY: lines are only handed off while the session is live
        prop_assert_eq!(submitted, app.is_connected());

        // PROPERTY: Enter always clears the line
        prop_assert_eq!(app.input().buffer(), "");
    });
}
