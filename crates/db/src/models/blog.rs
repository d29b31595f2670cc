//! Blog model (the live, mutable document).
//!
//! Blogs are owned by the CRUD workflow; the versioning engine only reads
//! them and overwrites their content fields during a restore.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `blogs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Blog {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub status: String,
    pub visibility: String,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A blog together with its live tag ids, as returned after a restore.
#[derive(Debug, Clone, Serialize)]
pub struct BlogWithTags {
    #[serde(flatten)]
    pub blog: Blog,
    pub tag_ids: Vec<DbId>,
}

/// DTO for creating a blog. `status` / `visibility` default to
/// `draft` / `public` when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlog {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

/// DTO for editing a blog. Only non-`None` fields are applied; `tag_ids`
/// replaces the tag set when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
    pub category_id: Option<DbId>,
    pub tag_ids: Option<Vec<DbId>>,
}
