//! Single-version deletion.

use folio_core::types::DbId;
use sqlx::PgPool;

use super::{ensure_author, VersionError};
use crate::repositories::{BlogRepo, BlogVersionRepo};

/// Removes one version by identity after checking ownership.
pub struct VersionDeleter;

impl VersionDeleter {
    /// Delete exactly the version `version_id`.
    ///
    /// The requester must be the author of the owning blog. No minimum number
    /// of remaining versions is enforced: a blog's last version can be deleted.
    pub async fn delete(
        pool: &PgPool,
        version_id: DbId,
        requester_id: DbId,
    ) -> Result<(), VersionError> {
        let mut tx = pool.begin().await?;

        let version = BlogVersionRepo::find_by_id_inner(&mut tx, version_id)
            .await?
            .ok_or(VersionError::VersionNotFound(version_id))?;
        let blog = BlogRepo::lock_for_update_inner(&mut tx, version.blog_id)
            .await?
            .ok_or(VersionError::BlogNotFound(version.blog_id))?;
        ensure_author(&blog, requester_id)?;

        if !BlogVersionRepo::delete_inner(&mut tx, version_id).await? {
            return Err(VersionError::VersionNotFound(version_id));
        }
        tx.commit().await?;

        tracing::info!(
            blog_id = blog.id,
            version_id,
            version_number = version.version_number,
            user_id = requester_id,
            "Blog version deleted"
        );
        Ok(())
    }
}
