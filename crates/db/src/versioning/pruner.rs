//! Retention: keep at most `keep` versions per blog, evicting the oldest.

use folio_core::types::DbId;
use folio_core::versioning::excess_versions;
use sqlx::PgPool;

use super::VersionError;
use crate::repositories::{BlogRepo, BlogVersionRepo};

/// Enforces the per-blog retention bound.
pub struct RetentionPruner;

impl RetentionPruner {
    /// Delete the lowest-numbered versions so at most `keep` remain.
    ///
    /// No-op when the blog has `keep` or fewer versions (or no longer exists),
    /// so repeated calls are idempotent. Returns the number of rows removed.
    pub async fn prune(pool: &PgPool, blog_id: DbId, keep: i64) -> Result<u64, VersionError> {
        let mut tx = pool.begin().await?;

        if BlogRepo::lock_for_update_inner(&mut tx, blog_id)
            .await?
            .is_none()
        {
            return Ok(0);
        }

        let count = BlogVersionRepo::count_by_blog_inner(&mut tx, blog_id).await?;
        let excess = excess_versions(count, keep);
        if excess == 0 {
            tx.commit().await?;
            tracing::debug!(blog_id, count, keep, "Retention: nothing to prune");
            return Ok(0);
        }

        let deleted = BlogVersionRepo::delete_oldest_inner(&mut tx, blog_id, excess).await?;
        tx.commit().await?;

        tracing::info!(blog_id, count, keep, deleted, "Retention: pruned oldest versions");
        Ok(deleted)
    }

    /// Best-effort prune following a successful capture. Failures are logged
    /// and swallowed: a just-created version must survive a failed prune.
    pub(crate) async fn prune_after_capture(pool: &PgPool, blog_id: DbId, keep: i64) {
        if let Err(e) = Self::prune(pool, blog_id, keep).await {
            tracing::warn!(blog_id, keep, error = %e, "Retention: prune after capture failed");
        }
    }
}
