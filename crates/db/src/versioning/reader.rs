//! Read-only access to version history.

use folio_core::pagination::{page_offset, PageInfo};
use folio_core::types::DbId;
use sqlx::PgPool;

use super::VersionError;
use crate::models::blog_version::{BlogVersion, BlogVersionDetail, BlogVersionPage};
use crate::repositories::BlogVersionRepo;

/// Lookup and paginated listing of versions. Takes no locks.
///
/// Reads that span more than one statement run in a single read-only
/// `REPEATABLE READ` transaction, so a concurrent delete or prune cannot land
/// between them.
pub struct VersionReader;

impl VersionReader {
    /// Open a read-only transaction whose statements all see one snapshot.
    pub async fn begin_snapshot(
        pool: &PgPool,
    ) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Fetch a version and its tag snapshot.
    pub async fn get(pool: &PgPool, version_id: DbId) -> Result<BlogVersionDetail, VersionError> {
        let mut tx = Self::begin_snapshot(pool).await?;
        let detail = Self::get_inner(&mut tx, version_id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// [`VersionReader::get`] within an existing transaction.
    pub async fn get_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        version_id: DbId,
    ) -> Result<BlogVersionDetail, VersionError> {
        let version = BlogVersionRepo::find_by_id_inner(tx, version_id)
            .await?
            .ok_or(VersionError::VersionNotFound(version_id))?;
        let tags = BlogVersionRepo::tags_for_version_inner(tx, version.id).await?;
        Ok(BlogVersionDetail { version, tags })
    }

    /// Fetch a blog's version by its number.
    pub async fn get_by_number(
        pool: &PgPool,
        blog_id: DbId,
        version_number: i32,
    ) -> Result<BlogVersion, VersionError> {
        BlogVersionRepo::find_by_blog_and_number(pool, blog_id, version_number)
            .await?
            .ok_or(VersionError::VersionNumberNotFound {
                blog_id,
                version_number,
            })
    }

    /// The blog's newest version, if it has any.
    pub async fn latest(pool: &PgPool, blog_id: DbId) -> Result<Option<BlogVersion>, VersionError> {
        Ok(BlogVersionRepo::find_latest(pool, blog_id).await?)
    }

    /// One page of a blog's versions, newest first.
    ///
    /// `page` is 1-based. `page_size` is used as given; clamping belongs to
    /// the caller.
    pub async fn list(
        pool: &PgPool,
        blog_id: DbId,
        page: i64,
        page_size: i64,
    ) -> Result<BlogVersionPage, VersionError> {
        let mut tx = Self::begin_snapshot(pool).await?;
        let total = BlogVersionRepo::count_by_blog_inner(&mut tx, blog_id).await?;
        let items = BlogVersionRepo::list_by_blog_inner(
            &mut tx,
            blog_id,
            page_size,
            page_offset(page, page_size),
        )
        .await?;
        tx.commit().await?;
        Ok(BlogVersionPage {
            items,
            page: PageInfo::new(total, page, page_size),
        })
    }

    /// Number of versions a blog has.
    pub async fn count(pool: &PgPool, blog_id: DbId) -> Result<i64, VersionError> {
        Ok(BlogVersionRepo::count_by_blog(pool, blog_id).await?)
    }
}
