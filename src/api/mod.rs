//! HTTP read API
//!
//! Exposes point-in-time lookups, range statistics and the audit log over REST.

pub mod http;
pub mod rest;
pub mod state;

pub use http::{create_router, serve};
pub use state::AppState;
