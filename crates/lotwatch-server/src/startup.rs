//! Startup helper that runs the sync service on a background task.
//!
//! [`spawn_server`] binds eagerly, so a port conflict is reported to the
//! caller rather than logged from inside the task. Binding port `0` and
//! reading [`RunningServer::local_addr`] is how tests get a live server.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lotwatch_server::startup::spawn_server;
//!
//! let shutdown = CancellationToken::new();
//! let running = spawn_server(&config, state, shutdown.clone()).await?;
//! // ...
//! shutdown.cancel();
//! running.handle.await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the sync service.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A sync service running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    /// The address actually bound.
    pub local_addr: SocketAddr,
    /// Completes once the server has shut down.
    pub handle: JoinHandle<()>,
}

/// Bind the configured address and serve on a background task until
/// `shutdown` is cancelled.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot be
/// bound.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<RunningServer, StartupError> {
    let listener = server::bind(config).await?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "sync service exited with error");
        }
    });

    tracing::info!(%local_addr, "sync service spawned on background task");

    Ok(RunningServer { local_addr, handle })
}
