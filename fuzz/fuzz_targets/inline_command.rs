//! Fuzz target for the inline command grammar
//!
//! Any typed line must classify and parse without panicking, and a line
//! that parses as a quote or reaction must classify as the same mode.

#![no_main]

use libfuzzer_sys::fuzz_target;
use localchat_client::{
    InlineCommand, InputMode,
    command::{classify, parse},
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mode = classify(text);
    match parse(text) {
        Some(InlineCommand::Quote { .. }) => assert_eq!(mode, InputMode::Quote),
        Some(InlineCommand::React { .. }) => assert_eq!(mode, InputMode::Reaction),
        _ => {},
    }
});
