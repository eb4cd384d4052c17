//! Local filesystem blob store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use quill_core::ports::{BlobError, BlobStore, validate_blob_name};

/// Stores each blob as a file named after it, directly under `root`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if needed.
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root).await?;
        tracing::info!(root = %store.root.display(), "Local blob store ready");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, BlobError> {
        validate_blob_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), "Blob written");
        Ok(name.to_string())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, BlobError> {
        let path = self.path_for(name)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_and_get_blob() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let name = store
            .put("photo_1700000000.png", b"png bytes".to_vec())
            .await
            .unwrap();

        assert_eq!(name, "photo_1700000000.png");
        assert!(dir.path().join("photo_1700000000.png").is_file());
        assert_eq!(
            store.get(&name).await.unwrap(),
            Some(b"png bytes".to_vec())
        );
    }

    #[tokio::test]
    async fn test_init_creates_nested_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("public").join("cover_images");

        let store = LocalBlobStore::init(&root).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[tokio::test]
    async fn test_delete_blob() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        store.put("gone.png", b"bytes".to_vec()).await.unwrap();
        assert!(store.exists("gone.png").await.unwrap());

        store.delete("gone.png").await.unwrap();
        assert!(!store.exists("gone.png").await.unwrap());

        // Deleting again is fine
        store.delete("gone.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_nonexistent_blob() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        assert_eq!(store.get("missing.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("covers"));

        let err = store
            .put("../escape.png", b"bytes".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, BlobError::InvalidName(_)));
        assert!(!dir.path().join("escape.png").exists());
    }
}
