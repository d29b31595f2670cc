//! Repository for the `blogs` and `blog_tags` tables.
//!
//! This is the document store the versioning engine collaborates with:
//! fetch by id, row-lock for update, apply a snapshot's fields and replace
//! the live tag set. `create` and `update` are the persist side of the blog
//! CRUD workflow in front of the engine; that workflow calls
//! `SnapshotCapture::capture` after each of them.

use folio_core::types::DbId;
use folio_core::versioning::{STATUS_DRAFT, VISIBILITY_PUBLIC};
use sqlx::PgPool;

use crate::models::blog::{Blog, CreateBlog, UpdateBlog};
use crate::models::blog_version::BlogVersion;

/// Column list for blogs queries.
const COLUMNS: &str = "id, author_id, title, slug, excerpt, content, thumbnail, \
    status, visibility, category_id, created_at, updated_at";

/// Provides CRUD and tag-association operations for blogs.
pub struct BlogRepo;

impl BlogRepo {
    /// Insert a new blog and its tag associations in one transaction.
    /// `status` / `visibility` default to `draft` / `public`.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateBlog,
    ) -> Result<Blog, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO blogs
                (author_id, title, slug, excerpt, content, thumbnail, status, visibility, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let blog = sqlx::query_as::<_, Blog>(&query)
            .bind(author_id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.thumbnail)
            .bind(input.status.as_deref().unwrap_or(STATUS_DRAFT))
            .bind(input.visibility.as_deref().unwrap_or(VISIBILITY_PUBLIC))
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.tag_ids.is_empty() {
            Self::replace_tags_inner(&mut tx, blog.id, &input.tag_ids).await?;
        }

        tx.commit().await?;
        Ok(blog)
    }

    /// Find a blog by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a blog. Only non-`None` fields in `input` are applied; a present
    /// `tag_ids` replaces the tag set.
    ///
    /// Returns `None` if no blog with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlog,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE blogs SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                content = COALESCE($5, content),
                thumbnail = COALESCE($6, thumbnail),
                status = COALESCE($7, status),
                visibility = COALESCE($8, visibility),
                category_id = COALESCE($9, category_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let blog = sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.thumbnail)
            .bind(&input.status)
            .bind(&input.visibility)
            .bind(input.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(blog), Some(tag_ids)) = (&blog, &input.tag_ids) {
            Self::replace_tags_inner(&mut tx, blog.id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(blog)
    }

    // -----------------------------------------------------------------------
    // Transactional helpers
    // -----------------------------------------------------------------------

    /// Fetch a blog and hold a row lock on it until the transaction ends.
    ///
    /// Every writer of a blog's version history takes this lock first, which
    /// serializes captures, restores and prunes on the same blog while leaving
    /// other blogs untouched.
    pub async fn lock_for_update_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Live tag ids of a blog within an existing transaction.
    pub async fn tag_ids_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT tag_id FROM blog_tags WHERE blog_id = $1 ORDER BY tag_id")
                .bind(blog_id)
                .fetch_all(&mut **tx)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Overwrite a blog's content fields with those of a version snapshot.
    pub async fn apply_snapshot_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
        version: &BlogVersion,
    ) -> Result<Blog, sqlx::Error> {
        let query = format!(
            "UPDATE blogs SET
                title = $2,
                slug = $3,
                excerpt = $4,
                content = $5,
                thumbnail = $6,
                status = $7,
                visibility = $8,
                category_id = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(blog_id)
            .bind(&version.title)
            .bind(&version.slug)
            .bind(&version.excerpt)
            .bind(&version.content)
            .bind(&version.thumbnail)
            .bind(&version.status)
            .bind(&version.visibility)
            .bind(version.category_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace (not merge) a blog's tag associations within an existing transaction.
    pub async fn replace_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        blog_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM blog_tags WHERE blog_id = $1")
            .bind(blog_id)
            .execute(&mut **tx)
            .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO blog_tags (blog_id, tag_id)
                 SELECT $1, t FROM UNNEST($2::BIGINT[]) AS t
                 ON CONFLICT DO NOTHING",
            )
            .bind(blog_id)
            .bind(tag_ids)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
