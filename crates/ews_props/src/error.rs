//! Error types for the properties crate.

use thiserror::Error;

/// Result type for property operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors that can occur while working with property types and locators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// A numeric type code has no symbolic name in the registry.
    #[error("unknown property type code: 0x{code:04x}")]
    UnknownTypeCode {
        /// The unrecognized code.
        code: u16,
    },

    /// A symbolic type name has no numeric code in the registry.
    #[error("unknown property type symbol: {symbol}")]
    UnknownTypeSymbol {
        /// The unrecognized symbol.
        symbol: String,
    },

    /// A textual number could not be parsed in any accepted encoding.
    #[error("invalid numeric text: {text:?}")]
    InvalidNumericText {
        /// The offending text.
        text: String,
    },

    /// A property set GUID could not be parsed.
    #[error("invalid property set id: {text:?}")]
    InvalidSetId {
        /// The offending text.
        text: String,
    },

    /// A packed tag was requested from a locator that is not tag-addressed.
    #[error("property is not tag-addressed (variant: {variant})")]
    NotTagged {
        /// The variant the locator actually classified as.
        variant: String,
    },

    /// A typed accessor was used on a property the entity does not carry.
    #[error("property not found")]
    NotFound,

    /// A property node arrived without a value element.
    #[error("extended property has no value")]
    MissingValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropertyError::UnknownTypeCode { code: 0x40 };
        assert_eq!(err.to_string(), "unknown property type code: 0x0040");

        let err = PropertyError::InvalidNumericText {
            text: "0xzz".into(),
        };
        assert!(err.to_string().contains("0xzz"));
    }
}
