//! Sources of aggregated lot summaries.
//!
//! [`LotFeed`] is the seam between the synchronizer and the network.
//! [`HttpFeed`] is the production implementation; tests substitute a
//! scripted feed.

use std::future::Future;
use std::time::Duration;

use lotwatch_types::LotSummary;
use tracing::debug;

use crate::error::ClientError;

/// Something that can produce the current summary of every lot.
pub trait LotFeed: Send + Sync + 'static {
    /// Fetch the current summaries.
    fn fetch(&self) -> impl Future<Output = Result<Vec<LotSummary>, ClientError>> + Send;
}

/// Fetches `GET {server_url}/api/lots` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    http: reqwest::Client,
    lots_url: String,
}

impl HttpFeed {
    /// Create a feed for the service at `server_url`. Every fetch is bounded
    /// by `timeout`, connection included.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lotwatch-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            http,
            lots_url: format!("{}/api/lots", server_url.trim_end_matches('/')),
        })
    }

    /// The full URL fetched on each refresh.
    pub fn lots_url(&self) -> &str {
        &self.lots_url
    }
}

impl LotFeed for HttpFeed {
    async fn fetch(&self) -> Result<Vec<LotSummary>, ClientError> {
        let response = self
            .http
            .get(&self.lots_url)
            .send()
            .await?
            .error_for_status()?;
        let lots: Vec<LotSummary> = response.json().await?;
        debug!(url = %self.lots_url, count = lots.len(), "fetched lot summaries");
        Ok(lots)
    }
}
