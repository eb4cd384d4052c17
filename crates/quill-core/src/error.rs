//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::BlobError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized access")]
    Unauthorized,

    /// A store or blob collaborator could not serve the request.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        DomainError::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    /// Convert into a domain error for the entity the query targeted.
    pub fn for_entity(self, entity_type: &'static str, id: Uuid) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::NotFound { entity_type, id },
            other => other.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Unavailable(msg),
            RepoError::NotFound => DomainError::Internal("record disappeared".to_string()),
            RepoError::Constraint(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<BlobError> for DomainError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::InvalidName(name) => {
                DomainError::Validation(format!("invalid file name: {}", name))
            }
            other => DomainError::Unavailable(other.to_string()),
        }
    }
}
