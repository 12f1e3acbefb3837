//! Headless polling client.
//!
//! Mirrors the sync service, logging the current recommendations for the
//! configured requester class every time a new snapshot is published, until
//! `Ctrl-C`.

use std::sync::Arc;

use lotwatch_client::{HttpFeed, Synchronizer, start};
use lotwatch_core::LotwatchConfig;
use lotwatch_types::default_catalog;
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

    info!("lotwatch-client starting");

    let config = LotwatchConfig::load()?;
    let client = &config.client;
    info!(
        server_url = client.server_url,
        refresh_interval_secs = client.refresh_interval_secs,
        fetch_timeout_ms = client.fetch_timeout_ms,
        requester = %client.requester,
        "configuration loaded"
    );

    let feed = HttpFeed::new(&client.server_url, client.fetch_timeout())?;
    let sync = Arc::new(Synchronizer::new(feed, default_catalog(), client.requester));
    let mut updates = sync.subscribe();

    let handle = start(Arc::clone(&sync), client.refresh_interval()).await;
    report(&sync);

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("shutdown signal received");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                report(&sync);
            }
        }
    }

    handle.shutdown().await;
    info!("lotwatch-client stopped");
    Ok(())
}

fn report(sync: &Synchronizer<HttpFeed>) {
    info!(
        requester = %sync.requester_class(),
        source = sync.source_label(),
        "recommendations"
    );
    for record in sync.recommendations() {
        info!(
            rank = record.rank,
            lot = record.name,
            status = %record.status,
            available = record.available_count,
            total = record.total_count,
            drive_time = record.drive_time,
            "recommended lot"
        );
    }
}
