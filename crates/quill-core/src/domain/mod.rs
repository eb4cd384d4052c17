//! Domain entities - the core business objects.

mod post;
mod upload;

pub use post::{CoverImage, NO_IMAGE, Page, Post, PostContent};
pub use upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy, UploadedFile};
