//! Tolerant numeric text parsing.

use crate::error::{PropertyError, PropertyResult};

/// Parses a property id or tag from its wire text form.
///
/// The wire format uses decimal, `0x`-prefixed hexadecimal, and
/// leading-zero encodings interchangeably for the same values, so all
/// three must decode or numeric tag comparisons silently fail. A leading
/// zero is read as decimal: observed wire values such as `089` contain
/// digits that are not valid octal, so the octal reading cannot be what
/// the server emits.
pub fn parse_numeric_text(text: &str) -> PropertyResult<u32> {
    let invalid = || PropertyError::InvalidNumericText { text: text.into() };

    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).map_err(|_| invalid());
    }
    text.parse::<u32>().map_err(|_| invalid())
}
