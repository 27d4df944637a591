//! Hex quantity encoding for block heights and numeric fields.

use thiserror::Error;

/// A hex quantity that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("empty hex quantity")]
    Empty,

    #[error("invalid hex quantity {0:?}")]
    Invalid(String),
}

/// Encode a block height as a `0x`-prefixed quantity (`100` → `"0x64"`).
pub fn encode_height(height: u64) -> String {
    format!("0x{height:x}")
}

/// Decode a hex quantity to `u64`. The `0x` prefix is optional.
pub fn parse_hex_u64(s: &str) -> Result<u64, HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err(HexError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexError::Invalid(s.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| HexError::Invalid(s.to_string()))
}
