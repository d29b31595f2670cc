//! Blog version model.
//!
//! Versions are immutable snapshots of a blog's content fields and tag set,
//! created on blog creation, every edit, explicit checkpoints and restores.

use folio_core::pagination::PageInfo;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::tag::Tag;

/// A row from the `blog_versions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BlogVersion {
    pub id: DbId,
    pub blog_id: DbId,
    pub version_number: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub status: String,
    pub visibility: String,
    pub category_id: Option<DbId>,
    pub editor_id: DbId,
    pub change_summary: Option<String>,
    pub created_at: Timestamp,
}

impl BlogVersion {
    /// Whether this snapshot carries the same content fields as another one.
    /// Identity, number, editor, summary and timestamp are ignored.
    pub fn same_content(&self, other: &BlogVersion) -> bool {
        self.title == other.title
            && self.slug == other.slug
            && self.excerpt == other.excerpt
            && self.content == other.content
            && self.thumbnail == other.thumbnail
            && self.status == other.status
            && self.visibility == other.visibility
            && self.category_id == other.category_id
    }
}

/// A version row plus the ids of its tag snapshot, used in listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogVersionListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub version: BlogVersion,
    pub tag_ids: Vec<DbId>,
}

/// A version with its full tag snapshot, used for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct BlogVersionDetail {
    #[serde(flatten)]
    pub version: BlogVersion,
    pub tags: Vec<Tag>,
}

/// One page of a blog's version history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct BlogVersionPage {
    pub items: Vec<BlogVersionListItem>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// Request body for an explicit checkpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCheckpoint {
    pub change_summary: Option<String>,
}
