//! Shared type definitions for lotwatch.
//!
//! This crate is the single source of truth for the types that cross crate
//! and process boundaries: lot identity, permit and requester classes, the
//! fixed lot catalog, and the JSON bodies exchanged between the sync service
//! and its polling clients.
//!
//! # Modules
//!
//! - [`ids`] -- The [`LotId`] newtype
//! - [`enums`] -- Permit classes, requester classes, and lot status
//! - [`catalog`] -- Lot definitions and the fixed four-lot catalog
//! - [`structs`] -- Wire bodies (aggregated snapshots, mutation results)

pub mod catalog;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use catalog::{CatalogError, LotDefinition, OccupancyRange, default_catalog};
pub use enums::{LotStatus, ParseRequesterError, PermitClass, RequesterClass};
pub use ids::LotId;
pub use structs::{BulkOutcome, LotDetail, LotSummary, RandomizeOutcome, ToggleOutcome};
