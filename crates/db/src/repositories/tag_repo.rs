//! Repository for the `tags` table.
//!
//! Tags are minted by the taxonomy workflow through [`TagRepo::create`]; the
//! versioning engine only references existing ids.

use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag};

/// Column list for tags queries.
const COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// Provides create operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }
}
