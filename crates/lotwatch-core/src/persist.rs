//! Durable snapshot file for the authoritative store.
//!
//! The whole store is written as one pretty-printed JSON object keyed by lot
//! id. Each entry carries the lot's descriptive fields and its full space
//! bitmap:
//!
//! ```json
//! {
//!   "17": {
//!     "lot_id": "17",
//!     "name": "Lot 17",
//!     "total_spaces": 35,
//!     "permit_type": "Student",
//!     "drive_time": 2,
//!     "walk_time": 4,
//!     "spaces": [false, true, ...]
//!   }
//! }
//! ```
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so a crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lotwatch_types::{LotDefinition, LotId, PermitClass};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::OccupancyStore;

/// Errors raised while reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading, writing or renaming the file failed.
    #[error("snapshot I/O on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One lot as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLot {
    /// Lot identifier.
    pub lot_id: LotId,
    /// Display name.
    pub name: String,
    /// Capacity at the time of writing.
    pub total_spaces: u32,
    /// Access rule.
    pub permit_type: PermitClass,
    /// Drive time in minutes.
    pub drive_time: u32,
    /// Walk time in minutes.
    pub walk_time: u32,
    /// One entry per space, `true` when occupied.
    pub spaces: Vec<bool>,
}

/// The full on-disk snapshot, keyed by lot id.
pub type LotRecords = BTreeMap<LotId, PersistedLot>;

/// Capture every lot of `store` as durable records.
pub fn capture(store: &OccupancyStore) -> LotRecords {
    store
        .lots()
        .iter()
        .map(|lot| {
            let def = lot.definition();
            let record = PersistedLot {
                lot_id: def.id().clone(),
                name: def.name().to_owned(),
                total_spaces: def.capacity(),
                permit_type: def.permit(),
                drive_time: def.drive_time(),
                walk_time: def.walk_time(),
                spaces: lot.spaces().to_vec(),
            };
            (def.id().clone(), record)
        })
        .collect()
}

/// Rebuild a store from `catalog` and previously captured records.
///
/// The catalog is authoritative for lot definitions; only bitmaps are taken
/// from the records. Records for unknown lots are dropped, catalog lots
/// without a record start empty, and bitmaps of the wrong length are padded
/// or truncated.
pub fn restore(catalog: Vec<LotDefinition>, records: &LotRecords) -> OccupancyStore {
    let mut store = OccupancyStore::new(catalog);
    for (id, record) in records {
        match store.load_bitmap(id, record.spaces.clone()) {
            Ok(true) => warn!(
                lot_id = %id,
                stored = record.spaces.len(),
                "stored bitmap length differs from capacity, resized"
            ),
            Ok(false) => {}
            Err(e) => warn!(lot_id = %id, error = %e, "dropping stored lot outside the catalog"),
        }
    }
    store
}

/// Location of the durable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Snapshot stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the snapshot. Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the file exists but cannot be read,
    /// or [`PersistError::Serialization`] if its content is not a snapshot.
    pub async fn load(&self) -> Result<Option<LotRecords>, PersistError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Write the snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the temporary file cannot be written
    /// or renamed into place.
    pub async fn save(&self, records: &LotRecords) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|source| PersistError::Io {
                path: temp.clone(),
                source,
            })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| PersistError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    /// Load the store from this file, falling back to an all-empty store
    /// when the file is missing or unreadable.
    pub async fn load_or_default(&self, catalog: Vec<LotDefinition>) -> OccupancyStore {
        match self.load().await {
            Ok(Some(records)) => {
                info!(path = %self.path.display(), lots = records.len(), "snapshot loaded");
                restore(catalog, &records)
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no snapshot found, starting empty");
                OccupancyStore::new(catalog)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "snapshot unreadable, starting empty");
                OccupancyStore::new(catalog)
            }
        }
    }
}
