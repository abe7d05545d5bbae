//! Configuration management for memlink.
//!
//! Configuration is loaded from (in priority order):
//! 1. Conventional environment variables (`NEO4J_URI`, `NEO4J_USER`,
//!    `NEO4J_USERNAME`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`, `PORT`)
//! 2. Prefixed environment variables (`MEMLINK__NEO4J__URI`, ...)
//! 3. Config file (`memlink.toml` by default)
//! 4. Defaults

use serde::Deserialize;

use crate::error::MemlinkError;

/// Top-level memlink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemlinkConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub graph: GraphSettings,

    #[serde(default)]
    pub query: QuerySettings,

    #[serde(default)]
    pub log: LogSettings,
}

/// Connection settings for the backing Neo4j instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Target database; the server default when unset.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `openapi.yaml` and `.well-known/ai-plugin.json`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors: bool,
}

/// Where relationship endpoints are looked up.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipScope {
    /// Only nodes carrying the written entity's label.
    Label,
    /// Nodes of any label.
    #[default]
    Any,
}

/// Graph write behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    /// Label used when a write omits one.
    #[serde(default = "default_label")]
    pub default_label: String,

    #[serde(default)]
    pub relationship_scope: RelationshipScope,
}

/// Query endpoint behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    /// Row limit applied when a request omits one or sends garbage.
    #[serde(default = "default_limit")]
    pub default_limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default = "default_true")]
    pub json: bool,
}

impl MemlinkConfig {
    /// Load configuration from `file_prefix` (extension optional, file may be
    /// absent) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self, MemlinkError> {
        let neo4j_user = std::env::var("NEO4J_USER")
            .or_else(|_| std::env::var("NEO4J_USERNAME"))
            .ok();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("MEMLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("neo4j.uri", std::env::var("NEO4J_URI").ok())?
            .set_override_option("neo4j.user", neo4j_user)?
            .set_override_option("neo4j.password", std::env::var("NEO4J_PASSWORD").ok())?
            .set_override_option("neo4j.database", std::env::var("NEO4J_DATABASE").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings that would only fail later at request time.
    pub fn validate(&self) -> Result<(), MemlinkError> {
        if crate::sanitize::sanitize_label(&self.graph.default_label).as_deref()
            != Some(self.graph.default_label.as_str())
        {
            return Err(MemlinkError::Config(format!(
                "graph.default_label '{}' must match [A-Za-z0-9_]+",
                self.graph.default_label
            )));
        }
        if self.query.default_limit < 0 {
            return Err(MemlinkError::Config(
                "query.default_limit must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "memlink-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_label() -> String {
    "Memory".to_string()
}

fn default_limit() -> i64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            cors: true,
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            default_label: default_label(),
            relationship_scope: RelationshipScope::default(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { json: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MemlinkConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.database, None);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.graph.default_label, "Memory");
        assert_eq!(config.graph.relationship_scope, RelationshipScope::Any);
        assert_eq!(config.query.default_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[neo4j]
uri = "bolt://graph.internal:7687"
database = "memories"

[server]
static_dir = "/srv/memlink"

[graph]
default_label = "Note"
relationship_scope = "label"

[query]
default_limit = 25
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = MemlinkConfig::load(path).unwrap();
        // The URI may be overridden by NEO4J_URI in the test environment.
        if std::env::var("NEO4J_URI").is_err() {
            assert_eq!(config.neo4j.uri, "bolt://graph.internal:7687");
        }
        assert_eq!(config.server.static_dir, "/srv/memlink");
        assert_eq!(config.graph.default_label, "Note");
        assert_eq!(config.graph.relationship_scope, RelationshipScope::Label);
        assert_eq!(config.query.default_limit, 25);
    }

    #[test]
    fn test_invalid_default_label_rejected() {
        let mut config = MemlinkConfig::default();
        config.graph.default_label = "Bad Label".to_string();
        assert!(matches!(config.validate(), Err(MemlinkError::Config(_))));
    }

    #[test]
    fn test_relationship_scope_parse() {
        let scope: RelationshipScope = serde_json::from_str("\"label\"").unwrap();
        assert_eq!(scope, RelationshipScope::Label);
    }
}
