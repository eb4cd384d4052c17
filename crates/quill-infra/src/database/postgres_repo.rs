//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use quill_core::domain::{Page, Post};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_recent(&self, per_page: u64, page: u64) -> Result<Page<Post>, RepoError> {
        tracing::debug!(per_page, page, "Listing recent posts");

        let paginator = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page);

        let total_items = paginator.num_items().await.map_err(map_db_err)?;

        // Past the end, or an offset that does not fit in u64: nothing to fetch.
        let offset = page.saturating_sub(1).checked_mul(per_page);
        if offset.is_none_or(|offset| offset >= total_items) {
            return Ok(Page::new(Vec::new(), page, per_page, total_items));
        }

        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            page,
            per_page,
            total_items,
        ))
    }
}
