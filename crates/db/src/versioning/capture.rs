//! Snapshot capture: turn a blog's current state into a new version.

use folio_core::types::DbId;
use folio_core::versioning::RetentionPolicy;
use sqlx::PgPool;

use super::numbering::{retry_on_collision, VersionNumberAssigner};
use super::{RetentionPruner, VersionError};
use crate::models::blog::Blog;
use crate::models::blog_version::BlogVersion;
use crate::repositories::{BlogRepo, BlogVersionRepo};

/// Materializes immutable versions from a blog's current state.
pub struct SnapshotCapture;

impl SnapshotCapture {
    /// Capture `blog` and `tag_ids` as the blog's next version inside an open
    /// transaction. The caller must already hold the blog's row lock.
    ///
    /// No validation is applied; the blog is assumed valid. The tag snapshot
    /// is written to its own join table, independent of the live tag set.
    pub async fn capture_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog: &Blog,
        tag_ids: &[DbId],
        editor_id: DbId,
        change_summary: Option<&str>,
    ) -> Result<BlogVersion, sqlx::Error> {
        let number = VersionNumberAssigner::next_number(tx, blog.id).await?;
        let version =
            BlogVersionRepo::insert_snapshot_inner(tx, blog, number, editor_id, change_summary)
                .await?;
        BlogVersionRepo::insert_tags_inner(tx, version.id, tag_ids).await?;
        Ok(version)
    }

    /// Capture the blog's current state as a new version, then prune.
    ///
    /// Used after the blog is created or edited and for explicit checkpoints.
    /// A pruning failure is logged and does not undo the capture.
    pub async fn capture(
        pool: &PgPool,
        blog_id: DbId,
        editor_id: DbId,
        change_summary: Option<&str>,
        policy: &RetentionPolicy,
    ) -> Result<BlogVersion, VersionError> {
        let version = retry_on_collision(blog_id, policy.max_numbering_attempts, || {
            Self::capture_once(pool, blog_id, editor_id, change_summary)
        })
        .await?;

        tracing::info!(
            blog_id,
            version_id = version.id,
            version_number = version.version_number,
            editor_id,
            "Blog version captured"
        );

        RetentionPruner::prune_after_capture(pool, blog_id, policy.keep).await;

        Ok(version)
    }

    async fn capture_once(
        pool: &PgPool,
        blog_id: DbId,
        editor_id: DbId,
        change_summary: Option<&str>,
    ) -> Result<BlogVersion, VersionError> {
        let mut tx = pool.begin().await?;

        let blog = BlogRepo::lock_for_update_inner(&mut tx, blog_id)
            .await?
            .ok_or(VersionError::BlogNotFound(blog_id))?;
        let tag_ids = BlogRepo::tag_ids_inner(&mut tx, blog_id).await?;

        let version =
            Self::capture_inner(&mut tx, &blog, &tag_ids, editor_id, change_summary).await?;

        tx.commit().await?;
        Ok(version)
    }
}
