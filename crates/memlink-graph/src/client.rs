//! Neo4j connection management and the executor seam.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};

use memlink_core::config::Neo4jSettings;

use crate::bolt;
use crate::statements::{self, Statement};

/// One result row, column name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Runs statements against the backing store.
///
/// Handlers only ever see this trait, so tests can swap the live client for
/// a scripted one.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    /// Execute a statement and collect every row as JSON.
    async fn execute(&self, statement: Statement) -> Result<Vec<Record>, GraphError>;

    /// Round-trip a trivial statement to prove the store is reachable.
    async fn ping(&self) -> Result<(), GraphError>;
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc). Each statement borrows a pooled connection
/// for its duration and returns it whether or not the statement succeeds.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(
            uri = %config.uri,
            database = config.database.as_deref().unwrap_or("<default>"),
            "Connected to Neo4j"
        );
        Ok(Self { graph })
    }

    /// Execute a read or write query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl CypherExecutor for GraphClient {
    async fn execute(&self, statement: Statement) -> Result<Vec<Record>, GraphError> {
        tracing::debug!(cypher = %statement.cypher, "Executing statement");
        let rows = self.query_rows(statement.into_query()).await?;
        rows.iter().map(bolt::row_to_record).collect()
    }

    async fn ping(&self) -> Result<(), GraphError> {
        self.query_rows(statements::ping().into_query()).await?;
        Ok(())
    }
}
