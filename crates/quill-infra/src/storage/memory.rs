//! In-memory blob store - for tests and database-less local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{BlobError, BlobStore, validate_blob_name};

/// Blob store keeping every file in a HashMap.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every stored blob, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        validate_blob_name(name)?;
        self.blobs.write().await.insert(name.to_string(), bytes);
        Ok(name.to_string())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError> {
        Ok(self.blobs.read().await.get(name).cloned())
    }

    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        self.blobs.write().await.remove(name);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.blobs.read().await.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryBlobStore::new();
        store.put("b.png", vec![2]).await.unwrap();
        store.put("a.png", vec![1]).await.unwrap();

        assert_eq!(store.names().await, ["a.png", "b.png"]);
        assert_eq!(store.get("a.png").await.unwrap(), Some(vec![1]));

        store.delete("a.png").await.unwrap();
        assert!(!store.exists("a.png").await.unwrap());
    }
}
