//! Configuration for the client engine.

use ews_protocol::DeleteType;

/// Configuration for client operations.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Page size for bounded enumeration and find requests.
    pub batch_size: u32,
    /// Maximum changes requested per sync page.
    pub sync_batch_size: u32,
    /// Disposal mode for delete requests.
    pub delete_type: DeleteType,
}

impl ClientConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            batch_size: 100,
            sync_batch_size: 100,
            delete_type: DeleteType::default(),
        }
    }

    /// Sets the enumeration page size.
    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the sync page size.
    pub fn with_sync_batch_size(mut self, size: u32) -> Self {
        self.sync_batch_size = size;
        self
    }

    /// Sets the delete disposal mode.
    pub fn with_delete_type(mut self, delete_type: DeleteType) -> Self {
        self.delete_type = delete_type;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ClientConfig::new()
            .with_batch_size(50)
            .with_sync_batch_size(25)
            .with_delete_type(DeleteType::HardDelete);

        assert_eq!(config.batch_size, 50);
        assert_eq!(config.sync_batch_size, 25);
        assert_eq!(config.delete_type, DeleteType::HardDelete);
    }

    #[test]
    fn default_page_size() {
        assert_eq!(ClientConfig::default().batch_size, 100);
    }
}
