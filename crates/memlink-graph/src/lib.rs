//! memlink-graph: Neo4j access for memlink.
//!
//! Every statement the service issues is built in [`statements`], executed
//! through the [`CypherExecutor`] seam, and converted back to JSON by
//! [`bolt`] and [`normalize`]. [`MemoryGraph`] ties these together into the
//! write, query, snapshot, and health operations the HTTP layer exposes.

pub mod bolt;
pub mod client;
pub mod memory;
pub mod mutations;
pub mod normalize;
pub mod queries;
pub mod snapshot;
pub mod statements;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{CypherExecutor, GraphClient, GraphConfig, GraphError, Record};
pub use memory::MemoryGraph;
pub use statements::Statement;
