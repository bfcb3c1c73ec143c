//! Base64 transport encoding for message text.
//!
//! Message, quote and reaction-target content travels base64-encoded
//! (standard alphabet, padded). Reaction text itself is sent as-is.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::errors::{ProtocolError, Result};

/// Encode plaintext for the wire.
pub fn encode_content(plaintext: &str) -> String {
    STANDARD.encode(plaintext.as_bytes())
}

/// Decode wire content back to text.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// message from a misbehaving peer still renders.
///
/// # Errors
///
/// - `ProtocolError::EmptyContent` for an empty string
/// - `ProtocolError::InvalidBase64` if the input is not standard base64
pub fn decode_content(encoded: &str) -> Result<String> {
    if encoded.is_empty() {
        return Err(ProtocolError::EmptyContent);
    }

    let bytes = STANDARD.decode(encoded).map_err(|e| ProtocolError::InvalidBase64(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_standard_alphabet() {
        assert_eq!(encode_content("hello"), "aGVsbG8=");
        assert_eq!(encode_content(""), "");
    }

    #[test]
    fn decodes_known_value() {
        assert_eq!(decode_content("aGVsbG8=").unwrap(), "hello");
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(decode_content(""), Err(ProtocolError::EmptyContent));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(decode_content("not base64!"), Err(ProtocolError::InvalidBase64(_))));
        assert!(matches!(decode_content("aGVsbG8"), Err(ProtocolError::InvalidBase64(_))));
    }
}
