//! Sync service entry point.
//!
//! Loads configuration, restores the occupancy store from the snapshot file
//! (or starts every lot empty), and serves the HTTP API until `Ctrl-C`.

use std::sync::Arc;

use lotwatch_core::LotwatchConfig;
use lotwatch_core::persist::SnapshotFile;
use lotwatch_server::{AppState, ServerConfig, spawn_server};
use lotwatch_types::default_catalog;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("lotwatch-server starting");

    let config = LotwatchConfig::load()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        data_file = %config.server.data_file.display(),
        "configuration loaded"
    );

    let snapshot_file = SnapshotFile::new(config.server.data_file.clone());
    let state = Arc::new(AppState::load(snapshot_file, default_catalog()).await);

    let shutdown = CancellationToken::new();
    let running = spawn_server(&ServerConfig::from(&config.server), state, shutdown.clone()).await?;
    info!(addr = %running.local_addr, "ready");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    shutdown.cancel();
    running.handle.await?;

    info!("lotwatch-server stopped");
    Ok(())
}
