//! Folio API server library.
//!
//! Exposes the boundary building blocks (config, state, error handling,
//! auth, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
