//! Occupancy rules and storage for lotwatch.
//!
//! This crate holds everything that is independent of transport:
//!
//! - [`store`] -- the authoritative, bitmap-based occupancy store
//! - [`mirror`] -- a client's count-based, immutable mirror snapshots
//! - [`occupancy`] -- count clamping and busy-range sampling shared by both
//! - [`status`] -- the Available / Limited / Full classifier
//! - [`access`] -- which requester classes may use which lots
//! - [`persist`] -- the durable JSON snapshot file
//! - [`config`] -- YAML configuration with environment overrides
//!
//! # Design Principles
//!
//! - Occupancy never leaves `0..=capacity`. Count writes are clamped, and
//!   the clamp is reported to the caller instead of being hidden.
//! - Stores are plain values owned by whoever constructs them. Sharing and
//!   locking belong to the service layer.
//! - Randomized operations take `&mut impl Rng` so tests can seed them.

pub mod access;
pub mod config;
pub mod mirror;
pub mod occupancy;
pub mod persist;
pub mod status;
pub mod store;

pub use access::{Permitted, can_use, recommended};
pub use config::{ClientSection, ConfigError, LotwatchConfig, ServerSection};
pub use mirror::{ConnectionState, MirrorSnapshot, MirroredLot};
pub use occupancy::OccupancyWrite;
pub use persist::{LotRecords, PersistError, PersistedLot, SnapshotFile};
pub use status::classify;
pub use store::{LotState, OccupancyStore, StoreError};
