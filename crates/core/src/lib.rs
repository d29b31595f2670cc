//! Folio core domain layer.
//!
//! Holds the pieces of the versioning engine that need no I/O: id and
//! timestamp aliases, the shared error type, pagination arithmetic and the
//! retention rules. Both the database layer and the HTTP boundary depend on
//! this crate; it depends on neither.

pub mod error;
pub mod pagination;
pub mod types;
pub mod versioning;
