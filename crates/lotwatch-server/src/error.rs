//! Error types for the sync service API.
//!
//! [`ApiError`] unifies all request failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! A failed durable write is deliberately absent: it is reported inside a
//! successful response body, because the in-memory mutation stands.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lotwatch_core::StoreError;

/// Errors that can occur in the sync service API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested lot does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The space index is not a valid index for the lot.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound(id) => Self::NotFound(format!("Lot not found: {id}")),
            StoreError::OutOfRange { .. } => Self::OutOfRange(format!("Invalid space index: {err}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::OutOfRange(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
