///
/// Cursor token armor.
///
/// Hex encoding keeps the token URL-safe without escaping and structurally
/// opaque without encryption. This module owns only the armor layer; payload
/// semantics live in the token codec.
///
use thiserror::Error as ThisError;

// Defensive decode bound for untrusted token input.
const MAX_TOKEN_HEX_LEN: usize = 8 * 1024;

///
/// ArmorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ArmorError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} hex chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token must have an even number of hex characters")]
    OddLength,

    #[error("invalid hex character at position {position}")]
    InvalidHex { position: usize },
}

/// Encode raw payload bytes as a lowercase hex token.
#[must_use]
pub(crate) fn encode_armor(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(out, "{byte:02x}");
    }

    out
}

/// Decode a hex token into payload bytes.
///
/// Mixed case is accepted and surrounding whitespace is trimmed.
pub(crate) fn decode_armor(token: &str) -> Result<Vec<u8>, ArmorError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(ArmorError::Empty);
    }

    if token.len() > MAX_TOKEN_HEX_LEN {
        return Err(ArmorError::TooLong {
            len: token.len(),
            max: MAX_TOKEN_HEX_LEN,
        });
    }

    if !token.len().is_multiple_of(2) {
        return Err(ArmorError::OddLength);
    }

    let bytes = token.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 2);

    for (pair_index, pair) in bytes.chunks_exact(2).enumerate() {
        let hi = hex_nibble(pair[0]).ok_or(ArmorError::InvalidHex {
            position: pair_index * 2 + 1,
        })?;
        let lo = hex_nibble(pair[1]).ok_or(ArmorError::InvalidHex {
            position: pair_index * 2 + 2,
        })?;

        out.push((hi << 4) | lo);
    }

    Ok(out)
}

const fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

///
/// TESTS
///
