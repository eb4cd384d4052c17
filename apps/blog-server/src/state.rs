//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostService;
use quill_core::domain::UploadPolicy;
use quill_core::ports::{BlobStore, PostRepository};
use quill_infra::{InMemoryPostRepository, LocalBlobStore};

#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub blobs: Arc<dyn BlobStore>,
    /// Human-readable name of the post store, for the health endpoint.
    pub post_store: &'static str,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::init(&config.storage_root).await?);

        #[cfg(feature = "postgres")]
        let (db, repo, post_store): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn PostRepository>,
            &'static str,
        ) = match &config.database {
            Some(db_config) => {
                let connections = DatabaseConnections::init(db_config).await?;
                if config.auto_migrate {
                    use migration::MigratorTrait;
                    migration::Migrator::up(&connections.main, None).await?;
                    tracing::info!("Database migrations applied");
                }
                let conn = Arc::new(connections);
                let repo = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                (Some(conn), repo, "postgres")
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Posts are kept in memory.");
                (None, Arc::new(InMemoryPostRepository::new()), "memory")
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (repo, post_store): (Arc<dyn PostRepository>, &'static str) = {
            tracing::info!("Running without postgres feature - posts are kept in memory");
            (Arc::new(InMemoryPostRepository::new()), "memory")
        };

        let posts = PostService::new(repo, blobs.clone())
            .with_upload_policy(UploadPolicy::new(config.upload_max_bytes))
            .with_page_size(config.posts_per_page);

        tracing::info!(post_store, "Application state initialized");

        Ok(Self {
            posts,
            blobs,
            post_store,
            #[cfg(feature = "postgres")]
            db,
        })
    }

    /// State over caller-supplied stores, with default policies.
    #[cfg(test)]
    pub fn with_stores(posts: Arc<dyn PostRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            posts: PostService::new(posts, blobs.clone()),
            blobs,
            post_store: "memory",
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(storage_root: std::path::PathBuf) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            auto_migrate: false,
            storage_root,
            upload_max_bytes: 1024,
            posts_per_page: 5,
        }
    }

    #[actix_web::test]
    async fn test_new_without_database_uses_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cover_images");

        let state = AppState::new(&config(root.clone())).await.unwrap();

        assert_eq!(state.post_store, "memory");
        assert_eq!(state.posts.max_upload_bytes(), 1024);
        assert!(root.is_dir());

        state.blobs.put("a_1.png", vec![1, 2, 3]).await.unwrap();
        assert!(root.join("a_1.png").is_file());
        assert_eq!(state.posts.list(1).await.unwrap().per_page, 5);
    }
}
