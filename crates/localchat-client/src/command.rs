//! Inline command grammar.
//!
//! Input text is checked against these forms, first match wins:
//!
//! 1. `[NNN] > text` quotes and `[NNN] >> text` reacts to message NNN
//! 2. `/qNNN text` quotes and `/rNNN text` reacts to message NNN
//! 3. `/sc #hex` sets this client's color, `/sn name` its username
//! 4. anything else is a plain message
//!
//! NNN is always exactly three digits. [`classify`] runs on every keystroke
//! for live feedback. [`parse`] runs on submit.

/// Live classification of the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Plain message
    #[default]
    Message,
    /// Quote by display index
    Quote,
    /// Reaction by display index
    Reaction,
    /// Settings subcommand
    Settings,
}

impl InputMode {
    /// Input field label, padded to a fixed width.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Message => " Message: ",
            Self::Quote => "   Quote: ",
            Self::Reaction => "Reaction: ",
            Self::Settings => "Settings: ",
        }
    }
}

/// A submitted line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineCommand {
    /// Plain message
    Plain {
        /// Message text
        text: String,
    },
    /// Reply quoting message `index`
    Quote {
        /// Display index of the quoted message
        index: usize,
        /// Reply text
        text: String,
    },
    /// Reaction to message `index`
    React {
        /// Display index of the message reacted to
        index: usize,
        /// Reaction text
        reaction: String,
    },
    /// Profile change
    Settings(SettingsCommand),
}

/// Settings subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// `/sc`: change color, value not yet validated
    Color {
        /// Requested color
        value: String,
    },
    /// `/sn`: change username
    Name {
        /// Requested username
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Quote(usize),
    React(usize),
    Color,
    Name,
}

fn three_digits(bytes: &[u8]) -> Option<usize> {
    match bytes {
        [a, b, c] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            Some(usize::from(a - b'0') * 100 + usize::from(b - b'0') * 10 + usize::from(c - b'0'))
        },
        _ => None,
    }
}

// `[NNN] > ` or `[NNN] >> `
fn bracket_form(text: &str) -> Option<(Form, usize)> {
    let bytes = text.as_bytes();
    if bytes.len() < 8 || bytes[0] != b'[' || bytes[4] != b']' || bytes[5] != b' ' {
        return None;
    }
    let index = three_digits(&bytes[1..4])?;

    match &bytes[6..] {
        [b'>', b'>', b' ', ..] => Some((Form::React(index), 9)),
        [b'>', b' ', ..] => Some((Form::Quote(index), 8)),
        _ => None,
    }
}

// `/qNNN ` or `/rNNN `
fn slash_form(text: &str) -> Option<(Form, usize)> {
    let bytes = text.as_bytes();
    if bytes.len() < 6 || bytes[0] != b'/' || bytes[5] != b' ' {
        return None;
    }
    let index = three_digits(&bytes[2..5])?;

    match bytes[1] {
        b'q' => Some((Form::Quote(index), 6)),
        b'r' => Some((Form::React(index), 6)),
        _ => None,
    }
}

// `/sc ` or `/sn `
fn settings_form(text: &str) -> Option<(Form, usize)> {
    if text.starts_with("/sc ") {
        Some((Form::Color, 4))
    } else if text.starts_with("/sn ") {
        Some((Form::Name, 4))
    } else {
        None
    }
}

fn match_form(text: &str) -> Option<(Form, usize)> {
    bracket_form(text).or_else(|| slash_form(text)).or_else(|| settings_form(text))
}

/// Classify input for live feedback.
pub fn classify(text: &str) -> InputMode {
    match match_form(text) {
        Some((Form::Quote(_), _)) => InputMode::Quote,
        Some((Form::React(_), _)) => InputMode::Reaction,
        Some((Form::Color | Form::Name, _)) => InputMode::Settings,
        None => InputMode::Message,
    }
}

/// Parse submitted input.
///
/// Returns `None` when there is nothing to send: blank input, or a quote or
/// reaction prefix with no text after it.
pub fn parse(text: &str) -> Option<InlineCommand> {
    if text.trim().is_empty() {
        return None;
    }

    let Some((form, prefix_len)) = match_form(text) else {
        return Some(InlineCommand::Plain { text: text.to_owned() });
    };
    // Every prefix is ASCII, so `prefix_len` is a char boundary.
    let rest = text.get(prefix_len..).unwrap_or_default();

    let command = match form {
        Form::Quote(index) => InlineCommand::Quote { index, text: rest.to_owned() },
        Form::React(index) => InlineCommand::React { index, reaction: rest.to_owned() },
        Form::Color => {
            InlineCommand::Settings(SettingsCommand::Color { value: rest.trim().to_owned() })
        },
        Form::Name => {
            InlineCommand::Settings(SettingsCommand::Name { value: rest.trim().to_owned() })
        },
    };

    match &command {
        InlineCommand::Quote { text, .. } if text.trim().is_empty() => None,
        InlineCommand::React { reaction, .. } if reaction.trim().is_empty() => None,
        _ => Some(command),
    }
}

/// `#` followed by exactly 3 or 6 hex digits, any case.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_reaction_beats_plain() {
        assert_eq!(
            parse("[007] >> nice"),
            Some(InlineCommand::React { index: 7, reaction: "nice".into() })
        );
        assert_eq!(classify("[007] >> nice"), InputMode::Reaction);
    }

    #[test]
    fn bracket_quote() {
        assert_eq!(
            parse("[042] > agreed"),
            Some(InlineCommand::Quote { index: 42, text: "agreed".into() })
        );
        assert_eq!(classify("[042] > "), InputMode::Quote);
    }

    #[test]
    fn slash_forms() {
        assert_eq!(parse("/q007 hi"), Some(InlineCommand::Quote { index: 7, text: "hi".into() }));
        assert_eq!(
            parse("/r123 :)"),
            Some(InlineCommand::React { index: 123, reaction: ":)".into() })
        );
    }

    #[test]
    fn settings_forms() {
        assert_eq!(
            parse("/sc #AbC"),
            Some(InlineCommand::Settings(SettingsCommand::Color { value: "#AbC".into() }))
        );
        assert_eq!(
            parse("/sn  dana "),
            Some(InlineCommand::Settings(SettingsCommand::Name { value: "dana".into() }))
        );
        assert_eq!(classify("/sc "), InputMode::Settings);
    }

    #[test]
    fn near_misses_are_plain() {
        let near_misses = [
            "[07] > hi",
            "[007]> hi",
            "[007] >>> hi",
            "/q07 hi",
            "/x007 hi",
            "/sx red",
            "[abc] > hi",
        ];
        for text in near_misses {
            assert_eq!(classify(text), InputMode::Message, "{text}");
            assert_eq!(parse(text), Some(InlineCommand::Plain { text: text.into() }), "{text}");
        }
    }

    #[test]
    fn prefix_needs_trailing_space() {
        assert_eq!(classify("[007] >>"), InputMode::Message);
        assert_eq!(classify("/q007"), InputMode::Message);
        assert_eq!(classify("/sc"), InputMode::Message);
    }

    #[test]
    fn nothing_to_send() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("[001] > "), None);
        assert_eq!(parse("/r001  "), None);
    }

    #[test]
    fn multibyte_text_after_prefix() {
        assert_eq!(
            parse("[000] >> 👍"),
            Some(InlineCommand::React { index: 0, reaction: "👍".into() })
        );
        assert_eq!(parse("héllo"), Some(InlineCommand::Plain { text: "héllo".into() }));
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#AaBbCc"));
        assert!(is_hex_color("#abc"));
        assert!(!is_hex_color("#abcd"));
        assert!(!is_hex_color("#"));
        assert!(!is_hex_color("abcdef"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn mode_labels_align() {
        for mode in
            [InputMode::Message, InputMode::Quote, InputMode::Reaction, InputMode::Settings]
        {
            assert_eq!(mode.label().len(), 10);
        }
    }
}
