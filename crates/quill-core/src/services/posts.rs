//! Post lifecycle: validation, ownership and cover image handling around CRUD.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CoverImage, Page, Post, PostContent, UploadPolicy, UploadedFile};
use crate::error::DomainError;
use crate::ports::{BlobStore, Clock, PostRepository, SystemClock};

/// Number of posts on one listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Post lifecycle manager.
///
/// Every mutating call takes the requesting user's id explicitly and checks
/// ownership itself, so callers cannot bypass the "only the owner mutates"
/// rule.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    uploads: UploadPolicy,
    per_page: u64,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            posts,
            blobs,
            clock: Arc::new(SystemClock),
            uploads: UploadPolicy::default(),
            per_page: POSTS_PER_PAGE,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_upload_policy(mut self, uploads: UploadPolicy) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn with_page_size(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Largest cover image accepted, in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.uploads.max_bytes
    }

    /// Newest posts first. Page 0 is read as page 1.
    pub async fn list(&self, page: u64) -> Result<Page<Post>, DomainError> {
        let page = page.max(1);
        Ok(self.posts.list_recent(self.per_page, page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Fetch a post for its owner, before showing an edit form.
    pub async fn edit(&self, id: Uuid, requester: Uuid) -> Result<Post, DomainError> {
        self.owned_post(id, requester).await
    }

    pub async fn create(
        &self,
        content: PostContent,
        owner_id: Uuid,
        upload: Option<UploadedFile>,
    ) -> Result<Post, DomainError> {
        content.validate()?;
        if let Some(file) = &upload {
            self.uploads.check(file)?;
        }

        let now = self.clock.now();
        let cover_image = match upload {
            Some(file) => self.store_cover(file, now).await?,
            None => CoverImage::Placeholder,
        };

        let post = Post::new(owner_id, content, cover_image, now);
        let saved = self.posts.insert(post).await?;

        tracing::info!(
            post_id = %saved.id,
            owner_id = %saved.owner_id,
            cover_image = %saved.cover_image,
            "Post created"
        );
        Ok(saved)
    }

    /// Replace title and body, and the cover image when a new one is uploaded.
    ///
    /// A replaced cover image stays in the blob store.
    pub async fn update(
        &self,
        id: Uuid,
        content: PostContent,
        requester: Uuid,
        upload: Option<UploadedFile>,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(id, requester).await?;

        content.validate()?;
        if let Some(file) = &upload {
            self.uploads.check(file)?;
        }

        let now = self.clock.now();
        if let Some(file) = upload {
            let previous = post.cover_image.clone();
            post.cover_image = self.store_cover(file, now).await?;
            if let Some(old) = previous.stored_name() {
                tracing::debug!(post_id = %id, old_cover = %old, "Previous cover image retained");
            }
        }
        post.title = content.title;
        post.body = content.body;
        post.updated_at = now;

        let saved = self
            .posts
            .update(post)
            .await
            .map_err(|e| e.for_entity("Post", id))?;

        tracing::info!(post_id = %id, cover_image = %saved.cover_image, "Post updated");
        Ok(saved)
    }

    /// Delete a post and, best effort, its cover image.
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), DomainError> {
        let post = self.owned_post(id, requester).await?;

        if let Some(name) = post.cover_image.stored_name() {
            if let Err(e) = self.blobs.delete(name).await {
                tracing::warn!(
                    post_id = %id,
                    cover_image = %name,
                    error = %e,
                    "Failed to delete cover image, removing post anyway"
                );
            }
        }

        self.posts
            .delete(id)
            .await
            .map_err(|e| e.for_entity("Post", id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn owned_post(&self, id: Uuid, requester: Uuid) -> Result<Post, DomainError> {
        let post = self.get(id).await?;
        if !post.is_owned_by(requester) {
            tracing::warn!(post_id = %id, requester = %requester, "Rejected non-owner access");
            return Err(DomainError::Unauthorized);
        }
        Ok(post)
    }

    async fn store_cover(
        &self,
        file: UploadedFile,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<CoverImage, DomainError> {
        let name = file.stored_name(now);
        let stored = self.blobs.put(&name, file.bytes).await?;
        tracing::debug!(cover_image = %stored, "Cover image stored");
        Ok(CoverImage::Stored(stored))
    }
}
