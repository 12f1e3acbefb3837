//! Sync service for the Lotwatch parking system.
//!
//! This crate provides an Axum HTTP server that owns the authoritative
//! per-space occupancy of every lot and exposes:
//!
//! - **Read endpoints** (`/api/lots`, `/api/lot/{id}`) returning aggregated
//!   counts and, for a single lot, the full space bitmap
//! - **Mutation endpoints** for toggling one space and for reset, fill and
//!   realistic randomization of a whole lot
//! - **Minimal HTML page** (`GET /`, `GET /admin`) with per-lot controls
//!
//! # Architecture
//!
//! The [`OccupancyStore`](lotwatch_core::OccupancyStore) sits behind a single
//! read-write lock in [`AppState`]. Every mutation writes the complete store
//! to a JSON snapshot file before the response is sent. A failed write is
//! reported in the response body and logged; the in-memory change stands.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{RunningServer, StartupError, spawn_server};
pub use state::{AppState, Persisted};
