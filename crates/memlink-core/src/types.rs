//! Request and response schemas for the memlink HTTP surface.
//!
//! Each endpoint deserializes into a loosely-shaped `*Request` and is then
//! validated into a `*Command` that the graph layer executes. Validation
//! failures are client errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MemlinkError;
use crate::sanitize::{find_forbidden_keyword, sanitize_label, sanitize_relationship_type};

// ── Write ─────────────────────────────────────────────────────────

/// How a write treats an existing node with the same `text`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Always insert a new node. Duplicates are allowed.
    #[default]
    Create,
    /// Merge by `text`, replacing `context` and `updatedAt` every time.
    Overwrite,
    /// Merge by `text`, leaving an existing node untouched.
    Skip,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship descriptor as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipSpec {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
}

/// A relationship with all fields present and its type sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub rel_type: String,
}

impl RelationshipSpec {
    /// Resolve into a usable relationship, or `None` if any field is missing
    /// or blank.
    pub fn resolve(&self) -> Option<Relationship> {
        let from = non_blank(self.from.as_deref())?;
        let to = non_blank(self.to.as_deref())?;
        let rel_type = sanitize_relationship_type(self.rel_type.as_deref()?)?;
        Some(Relationship {
            from: from.to_string(),
            to: to.to_string(),
            rel_type,
        })
    }
}

/// Body of `POST /write`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    pub text: String,
    pub label: Option<String>,
    pub context: Option<Map<String, Value>>,
    pub relationships: Option<Vec<RelationshipSpec>>,
    pub mode: Option<WriteMode>,
}

/// A validated write.
#[derive(Debug, Clone)]
pub struct WriteCommand {
    pub text: String,
    /// Sanitized label.
    pub label: String,
    pub mode: WriteMode,
    pub context: Map<String, Value>,
    pub relationships: Vec<Relationship>,
}

impl WriteRequest {
    pub fn validate(self, default_label: &str) -> Result<WriteCommand, MemlinkError> {
        if self.text.trim().is_empty() {
            return Err(MemlinkError::InvalidRequest(
                "'text' must be a non-empty string".to_string(),
            ));
        }

        let label = self
            .label
            .as_deref()
            .and_then(sanitize_label)
            .unwrap_or_else(|| default_label.to_string());

        let specs = self.relationships.unwrap_or_default();
        let relationships: Vec<Relationship> =
            specs.iter().filter_map(RelationshipSpec::resolve).collect();
        if relationships.len() < specs.len() {
            tracing::debug!(
                ignored = specs.len() - relationships.len(),
                "Ignoring incomplete relationship descriptors"
            );
        }

        Ok(WriteCommand {
            text: self.text,
            label,
            mode: self.mode.unwrap_or_default(),
            context: self.context.unwrap_or_default(),
            relationships,
        })
    }
}

/// Result of a write, serialized as the `POST /write` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum WriteOutcome {
    #[serde(rename = "ok", rename_all = "camelCase")]
    Written {
        label: String,
        mode: WriteMode,
        node_id: String,
        /// Number of relationship statements issued.
        relationships: usize,
    },
    /// `skip` mode found an existing node; relationships were not processed.
    #[serde(rename = "skipped")]
    Skipped { node: String },
}

// ── Query ─────────────────────────────────────────────────────────

/// Shape of rows in a query response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain column-to-value mappings.
    Records,
    /// Same as `Records`, with string `context` attributes decoded.
    #[default]
    Json,
}

/// Fixed query templates selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Nodes carrying one label, newest first.
    Entities,
    /// Every `(a)-[r]->(b)` triple.
    Graph,
    /// `Insight` nodes with their direct neighbours.
    Insights,
    /// Most recently updated nodes of any label.
    Recent,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Entities,
        Preset::Graph,
        Preset::Insights,
        Preset::Recent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Graph => "graph",
            Self::Insights => "insights",
            Self::Recent => "recent",
        }
    }
}

impl FromStr for Preset {
    type Err = MemlinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| MemlinkError::UnknownPreset(s.to_string()))
    }
}

/// Body of `POST /query`.
///
/// `cypher`, `params` and `limit` stay untyped so that wrong JSON types are
/// reported with a specific message instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    pub cypher: Option<Value>,
    pub params: Option<Value>,
    pub format: Option<OutputFormat>,
    pub preset: Option<String>,
    pub limit: Option<Value>,
}

/// What a validated query executes.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    Preset(Preset),
    Cypher(String),
}

/// A validated query.
#[derive(Debug, Clone)]
pub struct QueryCommand {
    pub source: QuerySource,
    pub params: Map<String, Value>,
    pub format: OutputFormat,
    pub limit: i64,
}

impl QueryCommand {
    pub fn preset(&self) -> Option<Preset> {
        match self.source {
            QuerySource::Preset(p) => Some(p),
            QuerySource::Cypher(_) => None,
        }
    }
}

impl QueryRequest {
    pub fn validate(self, default_limit: i64) -> Result<QueryCommand, MemlinkError> {
        let params = match self.params {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(MemlinkError::InvalidRequest(
                    "'params' must be an object".to_string(),
                ))
            }
        };

        let source = match self.preset.as_deref() {
            Some(name) => QuerySource::Preset(name.parse()?),
            None => {
                let cypher = match self.cypher {
                    Some(Value::String(s)) if !s.trim().is_empty() => s,
                    _ => {
                        return Err(MemlinkError::InvalidRequest(
                            "'cypher' must be a non-empty string or a preset must be given"
                                .to_string(),
                        ))
                    }
                };
                if let Some(keyword) = find_forbidden_keyword(&cypher) {
                    return Err(MemlinkError::ForbiddenKeyword { keyword });
                }
                QuerySource::Cypher(cypher)
            }
        };

        Ok(QueryCommand {
            source,
            params,
            format: self.format.unwrap_or_default(),
            limit: coerce_limit(self.limit.as_ref(), default_limit),
        })
    }
}

/// Body of a `POST /query` response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub status: &'static str,
    /// Number of result rows.
    pub records: usize,
    pub format: OutputFormat,
    pub preset: Option<Preset>,
    pub results: Vec<Value>,
}

// ── Graph snapshot ────────────────────────────────────────────────

/// Body of `POST /graph`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    pub limit: Option<Value>,
    pub filter_label: Option<String>,
}

/// A validated snapshot request.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphCommand {
    pub limit: i64,
    /// Sanitized label the source node must carry.
    pub filter_label: Option<String>,
}

impl GraphRequest {
    pub fn validate(self, default_limit: i64) -> GraphCommand {
        GraphCommand {
            limit: coerce_limit(self.limit.as_ref(), default_limit),
            filter_label: self.filter_label.as_deref().and_then(sanitize_label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    /// The node's `text`, which is also its identity in the snapshot.
    pub id: String,
    pub label: String,
    pub text: String,
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// Body of a `POST /graph` response.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub status: &'static str,
    pub nodes: Vec<SnapshotNode>,
    pub links: Vec<SnapshotLink>,
}

// ── Health ────────────────────────────────────────────────────────

/// Body of a `GET /health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error { error: String },
}

// ── Helpers ───────────────────────────────────────────────────────

/// Coerce a caller-supplied row limit to a non-negative integer.
///
/// Numbers are truncated toward zero and clamped at 0, numeric strings are
/// parsed the same way, and anything else falls back to `default`.
pub fn coerce_limit(value: Option<&Value>, default: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().and_then(float_to_limit)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_limit))
        }
        _ => None,
    };
    parsed.map(|n| n.max(0)).unwrap_or(default)
}

fn float_to_limit(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    // `as` saturates at the i64 bounds.
    Some(f.trunc() as i64)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}
