//! Public cover image downloads.

use actix_web::http::header;
use actix_web::{HttpResponse, web};

use quill_core::domain::NO_IMAGE;
use quill_core::ports::{BlobError, validate_blob_name};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const COVER_PATH: &str = "/storage/cover_images";

/// Public URL of a stored cover image.
pub fn cover_url(name: &str) -> String {
    format!("{}/{}", COVER_PATH, name)
}

/// GET /storage/cover_images/{name}
pub async fn show(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    if name == NO_IMAGE || validate_blob_name(&name).is_err() {
        return Err(not_found(&name));
    }

    let bytes = match state.blobs.get(&name).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) | Err(BlobError::InvalidName(_)) => return Err(not_found(&name)),
        Err(e) => return Err(AppError::Unavailable(e.to_string())),
    };

    let content_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}

fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("Cover image {} not found", name))
}
