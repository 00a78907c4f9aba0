//! Byte Codec - Hex text <-> raw bytes
//!
//! Converts the whitespace-separated hex listings users paste into byte
//! sequences, and renders byte sequences back in the canonical form.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a hex token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HexErrorReason {
    /// Nothing left after the `0x` prefix
    Empty,
    /// Contains a character outside `[0-9a-fA-F]`
    InvalidDigit,
    /// Parses, but does not fit in a byte
    OutOfRange,
}

impl fmt::Display for HexErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexErrorReason::Empty => write!(f, "empty token"),
            HexErrorReason::InvalidDigit => write!(f, "not a hex number"),
            HexErrorReason::OutOfRange => write!(f, "value exceeds 0xff"),
        }
    }
}

/// A token in hex text that is not a valid byte
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("token {index} ('{token}'): {reason}")]
pub struct HexError {
    /// 0-based index of the offending token
    pub index: usize,
    pub token: String,
    pub reason: HexErrorReason,
}

/// Parse whitespace-separated hex bytes (`"48 89 d8"`, `"0x48 0X89"`, `"9"`)
pub fn bytes_from_hex_text(text: &str) -> Result<Vec<u8>, HexError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            parse_byte(token).map_err(|reason| HexError {
                index,
                token: token.to_string(),
                reason,
            })
        })
        .collect()
}

fn parse_byte(token: &str) -> Result<u8, HexErrorReason> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() {
        return Err(HexErrorReason::Empty);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexErrorReason::InvalidDigit);
    }

    // Leading zeros are harmless ("00ff"); anything wider is out of range
    let significant = digits.trim_start_matches('0');
    if significant.len() > 2 {
        return Err(HexErrorReason::OutOfRange);
    }
    if significant.is_empty() {
        return Ok(0);
    }
    u8::from_str_radix(significant, 16).map_err(|_| HexErrorReason::OutOfRange)
}

/// Render bytes as lowercase two-digit hex separated by single spaces
pub fn hex_text_from_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let bytes = bytes_from_hex_text("48 89 5C 24 08").unwrap();
        assert_eq!(bytes, vec![0x48, 0x89, 0x5c, 0x24, 0x08]);
    }

    #[test]
    fn test_bare_and_prefixed_tokens() {
        let bytes = bytes_from_hex_text("9 0x90 0XfF 00ff").unwrap();
        assert_eq!(bytes, vec![0x09, 0x90, 0xff, 0xff]);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        assert!(bytes_from_hex_text("").unwrap().is_empty());
        assert!(bytes_from_hex_text("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_token_index() {
        let err = bytes_from_hex_text("48 ZZ 90").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.token, "ZZ");
        assert_eq!(err.reason, HexErrorReason::InvalidDigit);
    }

    #[test]
    fn test_out_of_range_and_empty_prefix() {
        let err = bytes_from_hex_text("90 100").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.reason, HexErrorReason::OutOfRange);

        let err = bytes_from_hex_text("0x").unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.reason, HexErrorReason::Empty);
    }

    #[test]
    fn test_normalizes_whitespace_and_case() {
        let text = "  48\t89\n\nD8  ";
        let normalized = hex_text_from_bytes(&bytes_from_hex_text(text).unwrap());
        assert_eq!(normalized, "48 89 d8");
    }

    #[test]
    fn test_render_every_byte_value() {
        let all: Vec<u8> = (0..=255).collect();
        let text = hex_text_from_bytes(&all);
        assert_eq!(text.len(), 256 * 3 - 1);
        assert_eq!(bytes_from_hex_text(&text).unwrap(), all);
    }
}
