//! Error types for the XML crate.

use thiserror::Error;

/// Result type for XML operations.
pub type XmlResult<T> = Result<T, XmlError>;

/// Errors that can occur while writing or parsing XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Failed to write an XML event.
    #[error("XML write failed: {0}")]
    Write(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("serialized XML is not valid UTF-8")]
    InvalidUtf8,

    /// The response document could not be parsed.
    #[error("malformed XML document: {0}")]
    Malformed(#[from] roxmltree::Error),

    /// A required element was missing from the document.
    #[error("missing element: {tag}")]
    MissingElement {
        /// Local name of the missing element.
        tag: String,
    },

    /// A required attribute was missing from an element.
    #[error("missing attribute {attribute} on element {tag}")]
    MissingAttribute {
        /// Local name of the element.
        tag: String,
        /// Name of the missing attribute.
        attribute: String,
    },
}

impl XmlError {
    /// Creates a missing element error.
    pub fn missing_element(tag: impl Into<String>) -> Self {
        Self::MissingElement { tag: tag.into() }
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute(tag: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            tag: tag.into(),
            attribute: attribute.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = XmlError::missing_element("ItemId");
        assert_eq!(err.to_string(), "missing element: ItemId");

        let err = XmlError::missing_attribute("ItemId", "ChangeKey");
        assert!(err.to_string().contains("ChangeKey"));
        assert!(err.to_string().contains("ItemId"));
    }
}
