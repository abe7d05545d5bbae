//! Cypher statement builder.
//!
//! Every statement the service runs is assembled here. Values are always
//! bound as parameters; only sanitized labels and relationship types are
//! interpolated, and those are backtick-quoted.

use neo4rs::query;
use serde_json::{Map, Value};

use memlink_core::config::RelationshipScope;
use memlink_core::sanitize::{quote_identifier, sanitize_label};
use memlink_core::{GraphCommand, Preset, Relationship, WriteCommand, WriteMode};

use crate::bolt::json_to_bolt;
use crate::client::GraphError;

/// A Cypher statement with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cypher: String,
    pub params: Map<String, Value>,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: Map::new(),
        }
    }

    pub fn with_params(cypher: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            cypher: cypher.into(),
            params,
        }
    }

    /// Bind a parameter, replacing any previous value under `key`.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Convert into a neo4rs query.
    pub fn into_query(self) -> neo4rs::Query {
        self.params
            .iter()
            .fold(query(&self.cypher), |q, (k, v)| q.param(k, json_to_bolt(v)))
    }
}

// ── Writes ───────────────────────────────────────────────────────

/// Build the statement that creates or merges the primary entity.
///
/// Returns a `nodeId` column, plus an `existed` column in skip mode.
pub fn entity(cmd: &WriteCommand, now: &str) -> Result<Statement, GraphError> {
    let label = quote_identifier(&cmd.label);
    let context = serde_json::to_string(&cmd.context)
        .map_err(|e| GraphError::Serialization(format!("Failed to serialize context: {e}")))?;

    let cypher = match cmd.mode {
        WriteMode::Create => format!(
            "CREATE (n:{label} {{text: $text, context: $context, createdAt: $now, updatedAt: $now}})
             RETURN elementId(n) AS nodeId"
        ),
        WriteMode::Overwrite => format!(
            "MERGE (n:{label} {{text: $text}})
             ON CREATE SET n.createdAt = $now
             SET n.context = $context, n.updatedAt = $now
             RETURN elementId(n) AS nodeId
             LIMIT 1"
        ),
        WriteMode::Skip => format!(
            "OPTIONAL MATCH (existing:{label} {{text: $text}})
             WITH count(existing) > 0 AS existed
             MERGE (n:{label} {{text: $text}})
             ON CREATE SET n.context = $context, n.createdAt = $now, n.updatedAt = $now
             RETURN elementId(n) AS nodeId, existed
             LIMIT 1"
        ),
    };

    Ok(Statement::new(cypher)
        .param("text", cmd.text.as_str())
        .param("context", context)
        .param("now", now))
}

/// Build the statement that merges one relationship between existing nodes.
///
/// Endpoints are matched by `text`. Missing endpoints make the statement a
/// no-op; the `merged` column reports how many edges were matched or created.
pub fn relationship(
    rel: &Relationship,
    label: &str,
    scope: RelationshipScope,
    now: &str,
) -> Statement {
    let node_label = match scope {
        RelationshipScope::Label => format!(":{}", quote_identifier(label)),
        RelationshipScope::Any => String::new(),
    };
    let rel_type = quote_identifier(&rel.rel_type);

    let cypher = format!(
        "MATCH (a{node_label} {{text: $from}})
         MATCH (b{node_label} {{text: $to}})
         MERGE (a)-[r:{rel_type}]->(b)
         ON CREATE SET r.createdAt = $now
         RETURN count(r) AS merged"
    );

    Statement::new(cypher)
        .param("from", rel.from.as_str())
        .param("to", rel.to.as_str())
        .param("now", now)
}

// ── Reads ────────────────────────────────────────────────────────

/// Build a preset query. Only `entities` reads a caller parameter (`label`).
pub fn preset(
    preset: Preset,
    params: &Map<String, Value>,
    default_label: &str,
    limit: i64,
) -> Statement {
    let statement = match preset {
        Preset::Entities => {
            let label = params
                .get("label")
                .and_then(Value::as_str)
                .and_then(sanitize_label)
                .unwrap_or_else(|| default_label.to_string());
            Statement::new(
                "MATCH (n)
                 WHERE $label IN labels(n)
                 RETURN n
                 ORDER BY n.createdAt DESC
                 LIMIT $limit",
            )
            .param("label", label)
        }
        Preset::Graph => Statement::new(
            "MATCH (a)-[r]->(b)
             RETURN a, r, b
             LIMIT $limit",
        ),
        Preset::Insights => Statement::new(
            "MATCH (i:Insight)
             OPTIONAL MATCH (i)-[r]-(n)
             RETURN i, r, n
             LIMIT $limit",
        ),
        Preset::Recent => Statement::new(
            "MATCH (n)
             WHERE n.updatedAt IS NOT NULL
             RETURN n
             ORDER BY n.updatedAt DESC
             LIMIT $limit",
        ),
    };
    statement.param("limit", limit)
}

/// Wrap a caller-supplied query. `$limit` is bound unless the caller
/// already supplied one.
pub fn literal(cypher: String, mut params: Map<String, Value>, limit: i64) -> Statement {
    params.entry("limit").or_insert_with(|| Value::from(limit));
    Statement::with_params(cypher, params)
}

/// Build the triple query behind the graph snapshot.
pub fn snapshot(cmd: &GraphCommand) -> Statement {
    Statement::new(
        "MATCH (a)-[r]->(b)
         WHERE $filterLabel IS NULL OR $filterLabel IN labels(a)
         RETURN a.text AS source, labels(a) AS sourceLabels, a.context AS sourceContext,
                type(r) AS type,
                b.text AS target, labels(b) AS targetLabels, b.context AS targetContext
         LIMIT $limit",
    )
    .param("filterLabel", cmd.filter_label.clone())
    .param("limit", cmd.limit)
}

/// Connectivity probe.
pub fn ping() -> Statement {
    Statement::new("RETURN 1 AS ok")
}
