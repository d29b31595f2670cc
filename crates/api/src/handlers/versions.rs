//! Handlers for blog version history.
//!
//! Every endpoint requires an authenticated author of the blog. Restore and
//! delete re-check ownership inside the versioning engine.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use folio_core::error::CoreError;
use folio_core::pagination::{clamp_page, clamp_page_size};
use folio_core::types::DbId;
use folio_core::versioning::{
    normalize_summary, validate_change_summary, DEFAULT_CHECKPOINT_SUMMARY,
};
use folio_db::models::blog::Blog;
use folio_db::models::blog_version::CreateCheckpoint;
use folio_db::repositories::{BlogRepo, BlogVersionRepo};
use folio_db::versioning::{
    RestoreOrchestrator, SnapshotCapture, VersionDeleter, VersionError, VersionReader,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a blog and require the caller to be its author.
async fn ensure_blog_owner(pool: &sqlx::PgPool, blog_id: DbId, user_id: DbId) -> AppResult<Blog> {
    let blog = BlogRepo::find_by_id(pool, blog_id).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "Blog",
            id: blog_id,
        },
    ))?;
    if blog.author_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Only the author of blog {blog_id} may access its versions"
        ))));
    }
    Ok(blog)
}

/// Reject a version id that belongs to a different blog than the path names.
fn ensure_version_of_blog(version_blog_id: DbId, blog_id: DbId, version_id: DbId) -> AppResult<()> {
    if version_blog_id != blog_id {
        return Err(VersionError::VersionMismatch {
            version_id,
            blog_id,
        }
        .into());
    }
    Ok(())
}

/* --------------------------------------------------------------------------
History
-------------------------------------------------------------------------- */

/// GET /blogs/{blog_id}/versions
///
/// One page of the blog's versions, newest first.
pub async fn list_versions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(blog_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    ensure_blog_owner(&state.pool, blog_id, auth.user_id).await?;

    let page = clamp_page(params.page);
    let page_size = clamp_page_size(params.page_size);
    let versions = VersionReader::list(&state.pool, blog_id, page, page_size).await?;

    Ok(Json(DataResponse { data: versions }))
}

/// POST /blogs/{blog_id}/versions
///
/// Capture the blog's current state as an explicit checkpoint.
pub async fn create_checkpoint(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(blog_id): Path<DbId>,
    body: Option<Json<CreateCheckpoint>>,
) -> AppResult<impl IntoResponse> {
    ensure_blog_owner(&state.pool, blog_id, auth.user_id).await?;

    let input = body.map(|Json(b)| b).unwrap_or_default();
    validate_change_summary(input.change_summary.as_deref())?;
    let summary = normalize_summary(input.change_summary.as_deref())
        .unwrap_or_else(|| DEFAULT_CHECKPOINT_SUMMARY.to_string());

    let version = SnapshotCapture::capture(
        &state.pool,
        blog_id,
        auth.user_id,
        Some(&summary),
        &state.config.versioning,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/* --------------------------------------------------------------------------
Single version
-------------------------------------------------------------------------- */

/// GET /blogs/{blog_id}/versions/{version_id}
///
/// A version with its tag snapshot.
pub async fn get_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((blog_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_blog_owner(&state.pool, blog_id, auth.user_id).await?;

    let detail = VersionReader::get(&state.pool, version_id).await?;
    ensure_version_of_blog(detail.version.blog_id, blog_id, version_id)?;

    Ok(Json(DataResponse { data: detail }))
}

/// POST /blogs/{blog_id}/versions/{version_id}/restore
///
/// Roll the blog back to this version. The restored state is appended as a
/// new version; the returned body is the live blog after the restore.
pub async fn restore_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((blog_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_blog_owner(&state.pool, blog_id, auth.user_id).await?;

    let blog = RestoreOrchestrator::restore(
        &state.pool,
        blog_id,
        version_id,
        auth.user_id,
        &state.config.versioning,
    )
    .await?;

    Ok(Json(DataResponse { data: blog }))
}

/// DELETE /blogs/{blog_id}/versions/{version_id}
pub async fn delete_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((blog_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_blog_owner(&state.pool, blog_id, auth.user_id).await?;

    let version = BlogVersionRepo::find_by_id(&state.pool, version_id)
        .await?
        .ok_or(VersionError::VersionNotFound(version_id))?;
    ensure_version_of_blog(version.blog_id, blog_id, version_id)?;

    VersionDeleter::delete(&state.pool, version_id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
