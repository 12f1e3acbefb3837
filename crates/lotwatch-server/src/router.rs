//! Axum router construction for the sync service.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled so
//! browser-based clients on other origins can poll the API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the sync service.
///
/// The router includes:
/// - `GET /` and `GET /admin` -- HTML status page
/// - `GET /api/lots` -- every lot
/// - `GET /api/lot/{id}` -- one lot with its bitmap
/// - `POST /api/lot/{id}/toggle/{index}` -- flip one space
/// - `POST /api/lot/{id}/reset`, `/fill`, `/random` -- bulk changes
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        .route("/admin", get(handlers::index))
        // Reads
        .route("/api/lots", get(handlers::list_lots))
        .route("/api/lot/{id}", get(handlers::get_lot))
        // Mutations
        .route("/api/lot/{id}/toggle/{index}", post(handlers::toggle_space))
        .route("/api/lot/{id}/reset", post(handlers::reset_lot))
        .route("/api/lot/{id}/fill", post(handlers::fill_lot))
        .route("/api/lot/{id}/random", post(handlers::randomize_lot))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
