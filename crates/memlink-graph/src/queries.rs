//! Read operations: ad-hoc and preset queries, snapshots, health.

use memlink_core::{
    GraphCommand, GraphSnapshot, HealthStatus, QueryCommand, QueryResponse, QuerySource,
};

use crate::client::GraphError;
use crate::memory::MemoryGraph;
use crate::normalize::format_record;
use crate::snapshot;
use crate::statements;

impl MemoryGraph {
    /// Run a literal or preset query and shape its rows.
    pub async fn query(&self, cmd: QueryCommand) -> Result<QueryResponse, GraphError> {
        let preset = cmd.preset();
        let stmt = match cmd.source {
            QuerySource::Preset(p) => {
                statements::preset(p, &cmd.params, self.default_label(), cmd.limit)
            }
            QuerySource::Cypher(cypher) => statements::literal(cypher, cmd.params, cmd.limit),
        };

        let rows = self.executor.execute(stmt).await?;
        let results: Vec<_> = rows
            .into_iter()
            .map(|row| format_record(row, cmd.format))
            .collect();

        tracing::debug!(
            preset = preset.map(|p| p.as_str()).unwrap_or("-"),
            rows = results.len(),
            "Query complete"
        );

        Ok(QueryResponse {
            status: "ok",
            records: results.len(),
            format: cmd.format,
            preset,
            results,
        })
    }

    /// Build the node/link snapshot used for visualization.
    pub async fn snapshot(&self, cmd: GraphCommand) -> Result<GraphSnapshot, GraphError> {
        let rows = self.executor.execute(statements::snapshot(&cmd)).await?;
        let snap = snapshot::assemble(&rows);
        tracing::debug!(
            nodes = snap.nodes.len(),
            links = snap.links.len(),
            "Snapshot built"
        );
        Ok(snap)
    }

    /// Probe the store. Failures are reported, never returned as errors.
    pub async fn health(&self) -> HealthStatus {
        match self.executor.ping().await {
            Ok(()) => HealthStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                HealthStatus::Error {
                    error: e.to_string(),
                }
            }
        }
    }
}
