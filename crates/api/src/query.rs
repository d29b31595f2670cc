//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination parameters (`?page=&page_size=`).
///
/// Values are clamped in the handler via `clamp_page` / `clamp_page_size`
/// before they reach the versioning engine.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
