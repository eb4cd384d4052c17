//! Multipart post form parsing.

use actix_multipart::{Field, Multipart};
use futures::{StreamExt, TryStreamExt};

use quill_core::domain::{PostContent, UploadedFile};

use crate::middleware::error::{AppError, AppResult};

/// Text fields longer than this are rejected outright.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// The fields of the create and edit forms.
#[derive(Debug, Default)]
pub struct PostForm {
    pub content: PostContent,
    pub cover_image: Option<UploadedFile>,
}

impl PostForm {
    /// Read `title`, `body` and the optional `cover_image` file.
    ///
    /// At most `max_file_bytes + 1` bytes of the file are kept, which is
    /// enough for the upload policy to reject an oversized file. A file part
    /// with an empty filename is what browsers send for an untouched file
    /// input, so it counts as no file. Unknown fields are drained and ignored.
    pub async fn read(mut payload: Multipart, max_file_bytes: usize) -> AppResult<Self> {
        let mut form = PostForm::default();

        while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.content.title = read_text(&mut field, &name).await?,
                "body" => form.content.body = read_text(&mut field, &name).await?,
                "cover_image" => form.cover_image = read_file(&mut field, max_file_bytes).await?,
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown form field");
                    drain(&mut field).await?;
                }
            }
        }

        Ok(form)
    }
}

async fn read_text(field: &mut Field, name: &str) -> AppResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(bad_multipart)?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::Validation(format!("{} is too long", name)));
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf)
        .map_err(|_| AppError::BadRequest(format!("{} is not valid UTF-8", name)))
}

async fn read_file(field: &mut Field, max_bytes: usize) -> AppResult<Option<UploadedFile>> {
    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let content_type = field.content_type().map(|mime| mime.to_string());

    let limit = max_bytes.saturating_add(1);
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(bad_multipart)?;
        if bytes.len() < limit {
            let take = chunk.len().min(limit - bytes.len());
            bytes.extend_from_slice(&chunk[..take]);
        }
    }

    if original_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    if original_name.is_empty() {
        return Err(AppError::Validation(
            "cover_image must be uploaded as a file".to_string(),
        ));
    }

    let mut file = UploadedFile::new(original_name, bytes);
    if let Some(content_type) = content_type {
        file = file.with_content_type(content_type);
    }
    Ok(Some(file))
}

async fn drain(field: &mut Field) -> AppResult<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(bad_multipart)?;
    }
    Ok(())
}

fn bad_multipart(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {}", err))
}
