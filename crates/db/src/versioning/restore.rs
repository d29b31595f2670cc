//! Restore: roll a blog back to a past version without rewriting history.

use folio_core::types::DbId;
use folio_core::versioning::{restore_summary, RetentionPolicy};
use sqlx::PgPool;

use super::numbering::retry_on_collision;
use super::{ensure_author, RetentionPruner, SnapshotCapture, VersionError};
use crate::models::blog::BlogWithTags;
use crate::models::blog_version::BlogVersion;
use crate::repositories::{BlogRepo, BlogVersionRepo};

/// Applies a past version to the live blog and appends the result as the
/// blog's newest version.
pub struct RestoreOrchestrator;

impl RestoreOrchestrator {
    /// Restore `blog_id` to the state captured in `version_id`.
    ///
    /// Preconditions are checked in order, each with its own error: the
    /// version exists, it belongs to `blog_id`, the blog exists, and
    /// `requester_id` is the blog's author. The blog's content fields are
    /// overwritten, its tag set is replaced by the snapshot's, and the restored
    /// state is captured as a new version, all in one transaction. Existing
    /// versions, including ones newer than the target, are left untouched.
    pub async fn restore(
        pool: &PgPool,
        blog_id: DbId,
        version_id: DbId,
        requester_id: DbId,
        policy: &RetentionPolicy,
    ) -> Result<BlogWithTags, VersionError> {
        let (restored, recorded) =
            retry_on_collision(blog_id, policy.max_numbering_attempts, || {
                Self::restore_once(pool, blog_id, version_id, requester_id)
            })
            .await?;

        tracing::info!(
            blog_id,
            restored_version_id = version_id,
            new_version_id = recorded.id,
            new_version_number = recorded.version_number,
            user_id = requester_id,
            "Blog restored to earlier version"
        );

        RetentionPruner::prune_after_capture(pool, blog_id, policy.keep).await;

        Ok(restored)
    }

    async fn restore_once(
        pool: &PgPool,
        blog_id: DbId,
        version_id: DbId,
        requester_id: DbId,
    ) -> Result<(BlogWithTags, BlogVersion), VersionError> {
        let mut tx = pool.begin().await?;

        let target = BlogVersionRepo::find_by_id_inner(&mut tx, version_id)
            .await?
            .ok_or(VersionError::VersionNotFound(version_id))?;
        if target.blog_id != blog_id {
            return Err(VersionError::VersionMismatch {
                version_id,
                blog_id,
            });
        }

        let blog = BlogRepo::lock_for_update_inner(&mut tx, blog_id)
            .await?
            .ok_or(VersionError::BlogNotFound(blog_id))?;
        ensure_author(&blog, requester_id)?;

        // A concurrent prune or delete may have removed the target while we
        // waited for the lock.
        let target = BlogVersionRepo::find_by_id_inner(&mut tx, version_id)
            .await?
            .ok_or(VersionError::VersionNotFound(version_id))?;
        let tag_ids = BlogVersionRepo::tag_ids_inner(&mut tx, target.id).await?;

        let blog = BlogRepo::apply_snapshot_inner(&mut tx, blog_id, &target).await?;
        BlogRepo::replace_tags_inner(&mut tx, blog_id, &tag_ids).await?;

        let summary = restore_summary(target.version_number);
        let recorded =
            SnapshotCapture::capture_inner(&mut tx, &blog, &tag_ids, requester_id, Some(&summary))
                .await?;

        tx.commit().await?;
        Ok((BlogWithTags { blog, tag_ids }, recorded))
    }
}
