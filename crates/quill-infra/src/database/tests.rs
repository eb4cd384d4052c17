use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use quill_core::domain::{CoverImage, NO_IMAGE, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn model(title: &str, cover_image: &str, created_secs: i64) -> post::Model {
    let at = Utc.timestamp_opt(created_secs, 0).unwrap();
    post::Model {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        title: title.to_owned(),
        body: "Body".to_owned(),
        cover_image: cover_image.to_owned(),
        created_at: at.into(),
        updated_at: at.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let row = model("Test Post", NO_IMAGE, 1_700_000_000);
    let post_id = row.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.cover_image, CoverImage::Placeholder);
}

#[tokio::test]
async fn test_insert_returns_stored_post() {
    let row = model("Fresh", "photo_1700000000.png", 1_700_000_000);
    let post: Post = row.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = repo.insert(post.clone()).await.unwrap();

    assert_eq!(saved, post);
    assert_eq!(
        saved.cover_image.stored_name(),
        Some("photo_1700000000.png")
    );
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let post: Post = model("Gone", NO_IMAGE, 1_700_000_000).into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = repo.update(post).await.unwrap_err();

    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_delete_reports_missing_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let id = Uuid::new_v4();

    BaseRepository::<Post, Uuid>::delete(&repo, id)
        .await
        .unwrap();
    assert!(matches!(
        BaseRepository::<Post, Uuid>::delete(&repo, id).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_list_recent_pages_results() {
    let newest = model("Newest", NO_IMAGE, 1_700_000_200);
    let older = model("Older", NO_IMAGE, 1_700_000_100);

    let count = BTreeMap::from([("num_items", Value::from(12i64))]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count]])
        .append_query_results(vec![vec![newest, older]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo.list_recent(10, 2).await.unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.total_items, 12);
    assert_eq!(page.total_pages, 2);
    let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Newest", "Older"]);
}

#[tokio::test]
async fn test_list_recent_past_last_page_skips_fetch() {
    let count = BTreeMap::from([("num_items", Value::from(3i64))]);

    // Only the count query is answered; a page fetch would hit an empty mock.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo.list_recent(10, 2).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.page, 2);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_list_recent_huge_page_is_empty() {
    let count = BTreeMap::from([("num_items", Value::from(3i64))]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo.list_recent(10, u64::MAX).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.page, u64::MAX);
    assert_eq!(page.total_items, 3);
}
