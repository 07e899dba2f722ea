//! Error types for the protocol layer.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// One failed element within an otherwise processed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorElement {
    /// Zero-based position of the element in the response batch.
    pub index: usize,
    /// Server response code, e.g. `ErrorInvalidChangeKey`.
    pub code: String,
    /// Human-readable message text from the server.
    pub text: String,
}

/// Errors that can occur while rendering requests or reading responses.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// XML serialization or parsing failed.
    #[error("xml error: {0}")]
    Xml(#[from] ews_xml::XmlError),

    /// Entity reconstruction from a response subtree failed.
    #[error("model error: {0}")]
    Model(#[from] ews_model::ModelError),

    /// Property addressing failed while rendering a request.
    #[error("property error: {0}")]
    Property(#[from] ews_props::PropertyError),

    /// The server rejected the whole request as structurally invalid.
    ///
    /// Fatal: no per-element results exist when this is raised.
    #[error("message fault {code}: {text}")]
    MessageFault {
        /// Fault code.
        code: String,
        /// Fault text.
        text: String,
    },

    /// One or more elements of a batch failed server-side processing.
    ///
    /// Raised only after the full batch has been walked; the success
    /// count travels with it so callers can judge partial success.
    #[error("{} of {} batch elements failed", errors.len(), errors.len() + successes)]
    ElementErrors {
        /// The indexed failures, in response order.
        errors: Vec<ErrorElement>,
        /// How many sibling elements succeeded.
        successes: usize,
    },

    /// A declared field has no wire field locator for update requests.
    #[error("no field locator known for tag {tag:?}")]
    UnsupportedField {
        /// The unmapped tag.
        tag: String,
    },

    /// The response did not contain the element the verb requires.
    #[error("response is missing {0}")]
    UnexpectedResponse(&'static str),
}

impl ProtocolError {
    /// Creates a message fault.
    pub fn fault(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::MessageFault {
            code: code.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_errors_display_counts() {
        let err = ProtocolError::ElementErrors {
            errors: vec![
                ErrorElement {
                    index: 1,
                    code: "ErrorInvalidChangeKey".into(),
                    text: "stale".into(),
                },
                ErrorElement {
                    index: 3,
                    code: "ErrorItemNotFound".into(),
                    text: "gone".into(),
                },
            ],
            successes: 3,
        };
        assert_eq!(err.to_string(), "2 of 5 batch elements failed");
    }

    #[test]
    fn fault_display() {
        let err = ProtocolError::fault("ErrorSchemaValidation", "bad request");
        assert!(err.to_string().contains("ErrorSchemaValidation"));
        assert!(err.to_string().contains("bad request"));
    }
}
