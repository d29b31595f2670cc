//! Per-blog version numbering.

use std::future::Future;

use folio_core::types::DbId;

use super::VersionError;
use crate::repositories::BlogVersionRepo;

/// Computes the next version number for a blog.
pub struct VersionNumberAssigner;

impl VersionNumberAssigner {
    /// One plus the blog's current maximum version number, or 1 if it has none.
    ///
    /// Must run in the transaction that inserts the version, after the blog's
    /// row lock has been taken; reading the max and inserting in separate
    /// transactions lets two captures compute the same number.
    pub async fn next_number(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        BlogVersionRepo::next_version_number_inner(tx, blog_id).await
    }
}

/// Run `op` until it succeeds or fails with something other than a version
/// number collision, at most `max_attempts` times.
///
/// Each attempt must be a complete transaction so a collision rolls back
/// everything the attempt wrote.
pub(crate) async fn retry_on_collision<T, F, Fut>(
    blog_id: DbId,
    max_attempts: u32,
    mut op: F,
) -> Result<T, VersionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VersionError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_numbering_collision() => {
                if attempt >= max_attempts {
                    tracing::warn!(blog_id, attempts = attempt, "Version numbering retries exhausted");
                    return Err(VersionError::NumberingConflict {
                        blog_id,
                        attempts: attempt,
                    });
                }
                tracing::warn!(blog_id, attempt, "Version number collision, retrying");
                attempt += 1;
            }
            other => return other,
        }
    }
}
