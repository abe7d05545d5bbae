//! memlink-core: Shared types, configuration, and error handling for memlink.
//!
//! This crate provides the foundational pieces used by the graph client and
//! the HTTP server:
//! - Request/response schemas for the write, query, and graph endpoints
//! - Write modes and query presets
//! - Identifier sanitizers for labels and relationship types
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;

pub use config::MemlinkConfig;
pub use error::MemlinkError;
pub use types::{
    GraphCommand, GraphRequest, GraphSnapshot, HealthStatus, OutputFormat, Preset, QueryCommand,
    QueryRequest, QueryResponse, QuerySource, Relationship, RelationshipSpec, SnapshotLink,
    SnapshotNode, WriteCommand, WriteMode, WriteOutcome, WriteRequest,
};
