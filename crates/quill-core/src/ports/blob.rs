//! Blob store port - named binary files such as cover images.

use async_trait::async_trait;

/// Blob store trait - abstraction over file storage backends (disk, in-memory).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `name`, replacing any existing blob. Returns the stored name.
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, BlobError>;

    /// Read a blob back.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Remove a blob. Removing a missing blob is not an error.
    async fn delete(&self, name: &str) -> Result<(), BlobError>;

    /// Check if a blob exists.
    async fn exists(&self, name: &str) -> Result<bool, BlobError>;
}

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid blob name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Rejects names that could escape the store's namespace.
pub fn validate_blob_name(name: &str) -> Result<(), BlobError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        Err(BlobError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
