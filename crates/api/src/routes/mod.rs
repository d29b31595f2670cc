pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /blogs/{blog_id}/versions    blog version history (list, checkpoint, detail, restore, delete)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/blogs/{blog_id}/versions", versions::router())
}
