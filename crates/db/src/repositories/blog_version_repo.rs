//! Repository for the `blog_versions` and `blog_version_tags` tables.
//!
//! Rows are append-only: this repository inserts, reads and deletes versions
//! but never updates one. Multi-step workflows (capture, restore, prune,
//! delete with ownership checks) live in [`crate::versioning`].

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::blog::Blog;
use crate::models::blog_version::{BlogVersion, BlogVersionListItem};
use crate::models::tag::Tag;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, blog_id, version_number, title, slug, excerpt, content, \
    thumbnail, status, visibility, category_id, editor_id, change_summary, created_at";

/// Column list qualified with the `v` alias (used in JOIN queries).
const V_COLUMNS: &str = "v.id, v.blog_id, v.version_number, v.title, v.slug, v.excerpt, \
    v.content, v.thumbnail, v.status, v.visibility, v.category_id, v.editor_id, \
    v.change_summary, v.created_at";

/// Column list for the `tags` table (used in JOIN queries).
const TAG_COLUMNS: &str = "t.id, t.name, t.slug, t.created_at, t.updated_at";

/// Name of the uniqueness constraint over `(blog_id, version_number)`.
pub const UQ_BLOG_VERSION_NUMBER: &str = "uq_blog_versions_blog_number";

/// Provides insert, read and delete operations for blog versions.
pub struct BlogVersionRepo;

impl BlogVersionRepo {
    // ── Reads ────────────────────────────────────────────────────────

    /// Find a version by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlogVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_versions WHERE id = $1");
        sqlx::query_as::<_, BlogVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific version number of a blog.
    pub async fn find_by_blog_and_number(
        pool: &PgPool,
        blog_id: DbId,
        version_number: i32,
    ) -> Result<Option<BlogVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_versions
             WHERE blog_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, BlogVersion>(&query)
            .bind(blog_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

    /// Find the highest-numbered version of a blog, if any.
    pub async fn find_latest(
        pool: &PgPool,
        blog_id: DbId,
    ) -> Result<Option<BlogVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_versions
             WHERE blog_id = $1
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, BlogVersion>(&query)
            .bind(blog_id)
            .fetch_optional(pool)
            .await
    }

    /// Count a blog's versions.
    pub async fn count_by_blog(pool: &PgPool, blog_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_versions WHERE blog_id = $1")
            .bind(blog_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    // ── Transactional helpers ────────────────────────────────────────

    /// Find a version by ID within an existing transaction.
    pub async fn find_by_id_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<BlogVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_versions WHERE id = $1");
        sqlx::query_as::<_, BlogVersion>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Next version number for a blog (max existing + 1, or 1 if none).
    ///
    /// Only meaningful inside the transaction that performs the insert and
    /// holds the blog's row lock.
    pub async fn next_version_number_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM blog_versions WHERE blog_id = $1",
        )
        .bind(blog_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    /// Insert a snapshot of `blog` under an explicit version number.
    pub async fn insert_snapshot_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog: &Blog,
        version_number: i32,
        editor_id: DbId,
        change_summary: Option<&str>,
    ) -> Result<BlogVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_versions
                (blog_id, version_number, title, slug, excerpt, content, thumbnail,
                 status, visibility, category_id, editor_id, change_summary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogVersion>(&query)
            .bind(blog.id)
            .bind(version_number)
            .bind(&blog.title)
            .bind(&blog.slug)
            .bind(&blog.excerpt)
            .bind(&blog.content)
            .bind(&blog.thumbnail)
            .bind(&blog.status)
            .bind(&blog.visibility)
            .bind(blog.category_id)
            .bind(editor_id)
            .bind(change_summary)
            .fetch_one(&mut **tx)
            .await
    }

    /// Write a version's tag snapshot. Duplicate ids collapse to one row.
    pub async fn insert_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        version_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO blog_version_tags (version_id, tag_id)
             SELECT DISTINCT $1::BIGINT, t FROM UNNEST($2::BIGINT[]) AS t",
        )
        .bind(version_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// List a page of a blog's versions with their tag ids, newest first.
    pub async fn list_by_blog_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BlogVersionListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {V_COLUMNS},
                    COALESCE(
                        ARRAY_AGG(vt.tag_id ORDER BY vt.tag_id) FILTER (WHERE vt.tag_id IS NOT NULL),
                        '{{}}'
                    ) AS tag_ids
             FROM blog_versions v
             LEFT JOIN blog_version_tags vt ON vt.version_id = v.id
             WHERE v.blog_id = $1
             GROUP BY v.id
             ORDER BY v.version_number DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BlogVersionListItem>(&query)
            .bind(blog_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    /// Tags in a version's snapshot, ordered by id.
    pub async fn tags_for_version_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        version_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {TAG_COLUMNS} FROM tags t
             JOIN blog_version_tags vt ON vt.tag_id = t.id
             WHERE vt.version_id = $1
             ORDER BY t.id"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(version_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Tag ids in a version's snapshot within an existing transaction.
    pub async fn tag_ids_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        version_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT tag_id FROM blog_version_tags WHERE version_id = $1 ORDER BY tag_id",
        )
        .bind(version_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Count a blog's versions within an existing transaction.
    pub async fn count_by_blog_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_versions WHERE blog_id = $1")
            .bind(blog_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.0)
    }

    /// Delete the `n` lowest-numbered versions of a blog in a single statement.
    /// Returns the number of rows removed.
    pub async fn delete_oldest_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
        n: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM blog_versions
             WHERE id IN (
                 SELECT id FROM blog_versions
                 WHERE blog_id = $1
                 ORDER BY version_number ASC
                 LIMIT $2
             )",
        )
        .bind(blog_id)
        .bind(n)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete one version by ID within an existing transaction.
    pub async fn delete_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_versions WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
