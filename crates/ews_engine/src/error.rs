//! Error types for the client engine.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Transport-level failure, below the protocol layer.
///
/// Fatal to the current operation; the engine never retries on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, TCP, or TLS level failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// The transport returned no response body.
    #[error("empty response from server")]
    EmptyResponse,
}

/// Errors that can occur while driving client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport collaborator failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Rendering or response interpretation failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ews_protocol::ProtocolError),

    /// Entity state was unusable for the requested verb.
    #[error("model error: {0}")]
    Model(#[from] ews_model::ModelError),
}

impl ClientError {
    /// True when the failure is an aggregate of element errors, meaning
    /// sibling elements in the same batch did succeed.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            ClientError::Protocol(ews_protocol::ProtocolError::ElementErrors { .. })
        )
    }
}
