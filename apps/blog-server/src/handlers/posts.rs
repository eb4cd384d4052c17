//! Post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Page, Post};
use quill_shared::ApiResponse;
use quill_shared::dto::{PageQuery, PostPageResponse, PostResponse};

use super::covers::cover_url;
use super::form::PostForm;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, FORBIDDEN_DELETE};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        owner_id: post.owner_id.to_string(),
        cover_image_url: post.cover_image.stored_name().map(cover_url),
        cover_image: post.cover_image.to_string(),
        title: post.title,
        body: post.body,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn page_response(page: Page<Post>) -> PostPageResponse {
    let page = page.map(post_response);
    PostPageResponse {
        posts: page.items,
        page: page.page,
        per_page: page.per_page,
        total: page.total_items,
        last_page: page.total_pages.max(1),
    }
}

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list(query.page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(page))))
}

/// GET /api/posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// GET /api/posts/{id}/edit - the post, for its owner only
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.edit(path.into_inner(), identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.posts.max_upload_bytes()).await?;

    let post = state
        .posts
        .create(form.content, identity.user_id, form.cover_image)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post_response(post),
        "Post Created",
    )))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.posts.max_upload_bytes()).await?;

    let post = state
        .posts
        .update(
            path.into_inner(),
            form.content,
            identity.user_id,
            form.cover_image,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(post),
        "Post Updated",
    )))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), identity.user_id)
        .await
        .map_err(|e| AppError::from(e).forbidden_as(FORBIDDEN_DELETE))?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post Deleted")))
}
