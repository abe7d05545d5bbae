//! CLI entry point for the memlink HTTP bridge.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use memlink_core::config::MemlinkConfig;
use memlink_graph::{GraphClient, GraphConfig, MemoryGraph};
use memlink_server::{build_router, AppState};

#[derive(Parser)]
#[command(name = "memlink")]
#[command(about = "HTTP bridge for storing and querying memories in Neo4j")]
struct Cli {
    /// Config file prefix (default: memlink).
    #[arg(short, long, default_value = "memlink")]
    config: String,

    /// Override the listening port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = MemlinkConfig::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    init_tracing(config.log.json);

    let client = GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?;

    let memory = MemoryGraph::from_config(Arc::new(client), &config);
    let state = AppState::new(memory, &config.server.static_dir);
    let app = build_router(state, config.server.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, static_dir = %config.server.static_dir, "memlink listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("memlink stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
