//! Assembly of the visualization snapshot from triple rows.

use std::collections::HashSet;

use serde_json::Value;

use memlink_core::{GraphSnapshot, SnapshotLink, SnapshotNode};

use crate::client::Record;
use crate::normalize::snapshot_context;

/// Accumulates nodes (deduplicated by `text`) and links from snapshot rows.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    seen: HashSet<String>,
    nodes: Vec<SnapshotNode>,
    links: Vec<SnapshotLink>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row produced by [`crate::statements::snapshot`].
    ///
    /// Rows whose endpoints lack `text` are skipped.
    pub fn push(&mut self, row: &Record) {
        let (Some(source), Some(target)) = (text_of(row, "source"), text_of(row, "target")) else {
            tracing::debug!("Skipping snapshot row without endpoint text");
            return;
        };

        self.add_node(source, row.get("sourceLabels"), row.get("sourceContext"));
        self.add_node(target, row.get("targetLabels"), row.get("targetContext"));

        self.links.push(SnapshotLink {
            source: source.to_string(),
            target: target.to_string(),
            rel_type: row
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    fn add_node(&mut self, text: &str, labels: Option<&Value>, context: Option<&Value>) {
        if !self.seen.insert(text.to_string()) {
            return;
        }
        let label = labels
            .and_then(Value::as_array)
            .and_then(|l| l.first())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.nodes.push(SnapshotNode {
            id: text.to_string(),
            label,
            text: text.to_string(),
            context: snapshot_context(context),
        });
    }

    pub fn finish(self) -> GraphSnapshot {
        GraphSnapshot {
            status: "ok",
            nodes: self.nodes,
            links: self.links,
        }
    }
}

fn text_of<'a>(row: &'a Record, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

/// Build a snapshot from all rows at once.
pub fn assemble(rows: &[Record]) -> GraphSnapshot {
    let mut builder = SnapshotBuilder::new();
    for row in rows {
        builder.push(row);
    }
    builder.finish()
}
