//! Sync service HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until the provided [`CancellationToken`] is cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use lotwatch_core::ServerSection;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Network configuration for the sync service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 5000,
        }
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
        }
    }
}

impl ServerConfig {
    /// Parse the configured host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the pair is not a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))
    }
}

/// Bind the configured address and serve until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    serve(listener, state, shutdown).await
}

/// Bind a TCP listener for the configured address.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or in use.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.socket_addr()?;
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Serve requests on an already bound listener until `shutdown` is
/// cancelled. In-flight requests are allowed to finish.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] on a fatal I/O error.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Serve(format!("no local address: {e}")))?;
    let router = build_router(state);

    info!(%addr, "sync service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!(%addr, "sync service stopped");
    Ok(())
}

/// Errors that can occur when starting or running the sync service.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
