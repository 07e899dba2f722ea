//! The transport seam: one blocking round trip per call.

use crate::error::TransportError;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A transport performs one authenticated POST and returns the raw
/// response body.
///
/// The engine issues exactly one `send` per verb invocation and blocks
/// until the full response is available. The transport never interprets
/// response content; retry and backoff policy, if any, also live behind
/// this seam.
pub trait Transport: Send + Sync {
    /// Sends request bytes and returns the raw response bytes.
    fn send(&self, request: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// A scripted transport for tests.
///
/// Canned responses are replayed in FIFO order; every outgoing request
/// is recorded for later inspection.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Vec<u8>>>,
    requests: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    /// Creates an empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a canned response.
    pub fn push_response(&self, response: impl Into<Vec<u8>>) {
        self.responses.lock().push_back(response.into());
    }

    /// The requests sent so far, in order.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().clone()
    }

    /// How many requests have been sent.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request.to_vec());
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| TransportError::Connection("no scripted response left".into()))
    }
}
