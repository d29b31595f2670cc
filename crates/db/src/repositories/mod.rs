//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods suffixed `_inner` take an open
//! transaction instead so the versioning engine can compose them atomically.

pub mod blog_repo;
pub mod blog_version_repo;
pub mod tag_repo;

pub use blog_repo::BlogRepo;
pub use blog_version_repo::BlogVersionRepo;
pub use tag_repo::TagRepo;
