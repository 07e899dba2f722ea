//! Error types for the entity model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or interrogating entities.
#[derive(Debug, Error)]
pub enum ModelError {
    /// XML serialization or parsing failed.
    #[error("xml error: {0}")]
    Xml(#[from] ews_xml::XmlError),

    /// Property addressing or lookup failed.
    #[error("property error: {0}")]
    Property(#[from] ews_props::PropertyError),

    /// An operation needed a bound entity (item id and change key set).
    #[error("entity is not bound to a remote record")]
    NotBound,

    /// A numeric wire field did not parse.
    #[error("invalid number in {tag}: {text:?}")]
    InvalidNumber {
        /// Tag of the offending element.
        tag: String,
        /// The text that failed to parse.
        text: String,
    },

    /// A scalar value did not map to a known enumeration member.
    #[error("invalid {what} code: {code}")]
    InvalidCode {
        /// What was being decoded.
        what: &'static str,
        /// The unrecognized code.
        code: u32,
    },
}

impl ModelError {
    /// Creates an invalid-number error.
    pub fn invalid_number(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::InvalidNumber {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::invalid_number("TotalCount", "many");
        assert!(err.to_string().contains("TotalCount"));
        assert!(err.to_string().contains("many"));

        assert_eq!(
            ModelError::NotBound.to_string(),
            "entity is not bound to a remote record"
        );
    }
}
