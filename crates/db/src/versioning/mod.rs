//! Blog versioning engine.
//!
//! Captures immutable snapshots of a blog, lists and restores them, and
//! bounds history growth with oldest-first eviction. Every public operation
//! is a single transaction; writers take the owning blog's row lock first so
//! operations on one blog serialize while different blogs proceed in parallel.
//!
//! Components, leaves first:
//! - [`VersionNumberAssigner`]: next per-blog number, evaluated in the insert's transaction.
//! - [`SnapshotCapture`]: materializes a version from the blog's current state.
//! - [`RetentionPruner`]: keeps at most `keep` versions per blog.
//! - [`VersionReader`]: lookup and paginated listing.
//! - [`RestoreOrchestrator`]: applies a past version and records the result as a new one.
//! - [`VersionDeleter`]: removes a single version after an ownership check.

mod capture;
mod deleter;
mod numbering;
mod pruner;
mod reader;
mod restore;

pub use capture::SnapshotCapture;
pub use deleter::VersionDeleter;
pub use numbering::VersionNumberAssigner;
pub use pruner::RetentionPruner;
pub use reader::VersionReader;
pub use restore::RestoreOrchestrator;

use folio_core::types::DbId;

use crate::models::blog::Blog;
use crate::repositories::blog_version_repo::UQ_BLOG_VERSION_NUMBER;

/// Errors surfaced by the versioning engine.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Version {0} not found")]
    VersionNotFound(DbId),

    /// The version exists but belongs to another blog.
    #[error("Version {version_id} does not belong to blog {blog_id}")]
    VersionMismatch { version_id: DbId, blog_id: DbId },

    #[error("Version {version_number} of blog {blog_id} not found")]
    VersionNumberNotFound { blog_id: DbId, version_number: i32 },

    #[error("Blog {0} not found")]
    BlogNotFound(DbId),

    #[error("User {user_id} is not the author of blog {blog_id}")]
    BlogAccessDenied { blog_id: DbId, user_id: DbId },

    /// Concurrent captures kept colliding on the same version number.
    #[error("Version number conflict on blog {blog_id} after {attempts} attempts")]
    NumberingConflict { blog_id: DbId, attempts: u32 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl VersionError {
    /// Whether this is a unique violation on `(blog_id, version_number)`.
    pub fn is_numbering_collision(&self) -> bool {
        match self {
            VersionError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
                    && db_err.constraint() == Some(UQ_BLOG_VERSION_NUMBER)
            }
            _ => false,
        }
    }
}

/// Require `requester_id` to be the blog's author.
///
/// Restore and delete call this themselves even when the boundary has already
/// checked, because both are reachable with a raw requester id.
pub(crate) fn ensure_author(blog: &Blog, requester_id: DbId) -> Result<(), VersionError> {
    if blog.author_id != requester_id {
        return Err(VersionError::BlogAccessDenied {
            blog_id: blog.id,
            user_id: requester_id,
        });
    }
    Ok(())
}
