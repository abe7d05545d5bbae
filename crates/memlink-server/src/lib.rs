//! memlink-server: HTTP surface for the memlink graph bridge.
//!
//! Routes JSON requests to [`memlink_graph::MemoryGraph`] operations and
//! serves the plugin manifest and OpenAPI document from disk.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
