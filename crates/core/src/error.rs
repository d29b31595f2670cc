//! Domain error shared by the database layer and the HTTP boundary.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row the caller referenced does not exist (404).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A version id was supplied together with a blog it does not belong to (400).
    #[error("Version {version_id} does not belong to blog {blog_id}")]
    VersionMismatch { version_id: DbId, blog_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transient write conflict the caller may retry (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The actor is authenticated but does not own the target (403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
