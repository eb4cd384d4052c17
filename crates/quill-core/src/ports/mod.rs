//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob;
mod clock;
mod repository;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use blob::{BlobError, BlobStore, validate_blob_name};
pub use clock::{Clock, SystemClock};
pub use repository::{BaseRepository, PostRepository};
