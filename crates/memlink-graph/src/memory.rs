//! The memory graph: write, query, snapshot, and health operations.

use std::sync::Arc;

use memlink_core::config::{GraphSettings, MemlinkConfig};

use crate::client::CypherExecutor;

/// Memory operations over an injected executor.
///
/// Holds no mutable state; clone freely and share across requests.
#[derive(Clone)]
pub struct MemoryGraph {
    pub(crate) executor: Arc<dyn CypherExecutor>,
    pub(crate) settings: GraphSettings,
    pub(crate) default_limit: i64,
}

impl MemoryGraph {
    pub fn new(
        executor: Arc<dyn CypherExecutor>,
        settings: GraphSettings,
        default_limit: i64,
    ) -> Self {
        Self {
            executor,
            settings,
            default_limit,
        }
    }

    /// Build from the loaded service configuration.
    pub fn from_config(executor: Arc<dyn CypherExecutor>, config: &MemlinkConfig) -> Self {
        Self::new(executor, config.graph.clone(), config.query.default_limit)
    }

    /// Label applied to writes that omit one.
    pub fn default_label(&self) -> &str {
        &self.settings.default_label
    }

    /// Row limit applied to reads that omit one.
    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }
}
