//! Error types for fetching occupancy from the sync service.
//!
//! None of these are fatal to a client. Every variant folds into the
//! disconnected state and the next refresh tries again.

/// Errors that can occur while fetching lot summaries.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not complete: connection refused, DNS failure, or
    /// timeout.
    #[error("sync service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-success status code.
    #[error("sync service returned HTTP {0}")]
    Status(u16),

    /// The response body was not a list of lot summaries.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}
