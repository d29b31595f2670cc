//! Route definitions for blog version history.
//!
//! Registered under `/blogs/{blog_id}/versions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Blog version routes.
///
/// ```text
/// GET    /                      list_versions
/// POST   /                      create_checkpoint
/// GET    /{version_id}          get_version
/// DELETE /{version_id}          delete_version
/// POST   /{version_id}/restore  restore_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(versions::list_versions).post(versions::create_checkpoint),
        )
        .route(
            "/{version_id}",
            get(versions::get_version).delete(versions::delete_version),
        )
        .route("/{version_id}/restore", post(versions::restore_version))
}
