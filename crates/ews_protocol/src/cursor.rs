//! The opaque incremental-sync cursor.

/// A server-issued sync position token.
///
/// Cursors are opaque: not comparable for order, not inspectable, and
/// valid for exactly one submission. A cursor obtained from one sync
/// response is the only acceptable input to the next sync request; this
/// is also the one piece of state callers are expected to persist
/// across process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCursor(String);

impl SyncCursor {
    /// Wraps a server-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for persistence or request rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SyncCursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}
