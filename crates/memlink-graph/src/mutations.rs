//! Write operations for the memory graph.
//!
//! One statement upserts the primary entity, then one statement per
//! relationship runs sequentially. The statements share no transaction: a
//! failure part-way through leaves the earlier ones applied and is reported
//! to the caller as-is.

use chrono::Utc;
use serde_json::Value;

use memlink_core::{WriteCommand, WriteMode, WriteOutcome};

use crate::client::{GraphError, Record};
use crate::memory::MemoryGraph;
use crate::statements;

impl MemoryGraph {
    /// Create or merge an entity and its relationships.
    pub async fn write(&self, cmd: WriteCommand) -> Result<WriteOutcome, GraphError> {
        let now = Utc::now().to_rfc3339();

        let rows = self
            .executor
            .execute(statements::entity(&cmd, &now)?)
            .await?;
        let row = rows.first();

        if cmd.mode == WriteMode::Skip && existed(row) {
            tracing::info!(text = %cmd.text, label = %cmd.label, "Entity exists, skipping write");
            return Ok(WriteOutcome::Skipped { node: cmd.text });
        }

        let node_id = row
            .and_then(|r| r.get("nodeId"))
            .map(node_id_string)
            .unwrap_or_default();

        for rel in &cmd.relationships {
            let stmt =
                statements::relationship(rel, &cmd.label, self.settings.relationship_scope, &now);
            let rows = self.executor.execute(stmt).await?;
            let merged = rows
                .first()
                .and_then(|r| r.get("merged"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            if merged == 0 {
                tracing::debug!(
                    from = %rel.from,
                    to = %rel.to,
                    rel_type = %rel.rel_type,
                    "Relationship endpoints not found, nothing merged"
                );
            }
        }

        tracing::info!(
            text = %cmd.text,
            label = %cmd.label,
            mode = %cmd.mode,
            node_id = %node_id,
            relationships = cmd.relationships.len(),
            "Entity written"
        );

        Ok(WriteOutcome::Written {
            label: cmd.label,
            mode: cmd.mode,
            node_id,
            relationships: cmd.relationships.len(),
        })
    }
}

fn existed(row: Option<&Record>) -> bool {
    row.and_then(|r| r.get("existed"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn node_id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use memlink_core::config::{GraphSettings, RelationshipScope};
    use memlink_core::WriteRequest;
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedExecutor;

    fn graph(executor: Arc<ScriptedExecutor>) -> MemoryGraph {
        MemoryGraph::new(executor, GraphSettings::default(), 100)
    }

    fn command(body: Value) -> WriteCommand {
        serde_json::from_value::<WriteRequest>(body)
            .unwrap()
            .validate("Memory")
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_write_issues_entity_then_relationships() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:1"})]);
        exec.push_rows(vec![json!({"merged": 1})]);

        let outcome = graph(exec.clone())
            .write(command(json!({
                "text": "A",
                "relationships": [
                    {"from": "A", "to": "B", "type": "likes"},
                    {"from": "A", "type": "IGNORED"}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WriteOutcome::Written {
                label: "Memory".to_string(),
                mode: WriteMode::Create,
                node_id: "4:db:1".to_string(),
                relationships: 1,
            }
        );

        let stmts = exec.statements();
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].cypher.starts_with("CREATE"));
        assert!(stmts[1].cypher.contains("[r:`LIKES`]"));
    }

    #[tokio::test]
    async fn test_skip_existing_bypasses_relationships() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:1", "existed": true})]);

        let outcome = graph(exec.clone())
            .write(command(json!({
                "text": "A",
                "mode": "skip",
                "relationships": [{"from": "A", "to": "B", "type": "LIKES"}]
            })))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WriteOutcome::Skipped {
                node: "A".to_string()
            }
        );
        assert_eq!(exec.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_new_node_processes_relationships() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:9", "existed": false})]);

        let outcome = graph(exec.clone())
            .write(command(json!({
                "text": "A",
                "mode": "skip",
                "relationships": [{"from": "A", "to": "B", "type": "LIKES"}]
            })))
            .await
            .unwrap();

        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert_eq!(exec.statements().len(), 2);
    }

    #[tokio::test]
    async fn test_relationship_failure_keeps_earlier_statements() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:1"})]);
        exec.push_rows(vec![json!({"merged": 1})]);
        exec.push_error("constraint violated");

        let err = graph(exec.clone())
            .write(command(json!({
                "text": "A",
                "mode": "overwrite",
                "relationships": [
                    {"from": "A", "to": "B", "type": "ONE"},
                    {"from": "A", "to": "C", "type": "TWO"},
                    {"from": "A", "to": "D", "type": "THREE"}
                ]
            })))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("constraint violated"));
        // The second relationship failed; the third was never issued.
        assert_eq!(exec.statements().len(), 3);
    }

    #[tokio::test]
    async fn test_relationship_scope_from_settings() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:1"})]);

        let settings = GraphSettings {
            default_label: "Memory".to_string(),
            relationship_scope: RelationshipScope::Label,
        };
        MemoryGraph::new(exec.clone(), settings, 100)
            .write(command(json!({
                "text": "A",
                "label": "Person",
                "relationships": [{"from": "A", "to": "B", "type": "KNOWS"}]
            })))
            .await
            .unwrap();

        let stmts = exec.statements();
        assert!(stmts[1].cypher.contains("MATCH (a:`Person` {text: $from})"));
    }
}
