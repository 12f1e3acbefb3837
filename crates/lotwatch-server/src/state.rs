//! Shared application state for the sync service.
//!
//! [`AppState`] owns the authoritative [`OccupancyStore`] behind a
//! read-write lock, plus the snapshot file it is flushed to. Reads share the
//! lock; every mutation takes it exclusively for both the bitmap update and
//! the durable write, so no reader ever sees a half-applied change and no
//! two mutations interleave.

use lotwatch_core::persist::{self, PersistError, SnapshotFile};
use lotwatch_core::{OccupancyStore, StoreError};
use lotwatch_types::LotDefinition;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::warn;

/// Result of a mutation plus the outcome of its durable write.
#[derive(Debug)]
pub struct Persisted<T> {
    /// What the mutation returned.
    pub value: T,
    /// Set when the snapshot could not be written. The in-memory change
    /// stands regardless.
    pub persist_error: Option<PersistError>,
}

impl<T> Persisted<T> {
    /// Whether the durable snapshot was written.
    pub const fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Human-readable reason the snapshot was not written.
    pub fn warning(&self) -> Option<String> {
        self.persist_error
            .as_ref()
            .map(|e| format!("change applied but not persisted: {e}"))
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug)]
pub struct AppState {
    store: RwLock<OccupancyStore>,
    snapshot_file: SnapshotFile,
}

impl AppState {
    /// Create state around an existing store.
    pub fn new(store: OccupancyStore, snapshot_file: SnapshotFile) -> Self {
        Self {
            store: RwLock::new(store),
            snapshot_file,
        }
    }

    /// Create state from the snapshot file, or from an empty catalog store
    /// if there is no usable snapshot.
    pub async fn load(snapshot_file: SnapshotFile, catalog: Vec<LotDefinition>) -> Self {
        let store = snapshot_file.load_or_default(catalog).await;
        Self::new(store, snapshot_file)
    }

    /// The snapshot file mutations are flushed to.
    pub const fn snapshot_file(&self) -> &SnapshotFile {
        &self.snapshot_file
    }

    /// Shared read access to the store.
    pub async fn read(&self) -> RwLockReadGuard<'_, OccupancyStore> {
        self.store.read().await
    }

    /// Apply `op` under the exclusive lock and write the whole store to the
    /// snapshot file before releasing it.
    ///
    /// If `op` fails nothing is written. If the write fails the mutation is
    /// kept and the failure is returned in [`Persisted::persist_error`].
    ///
    /// # Errors
    ///
    /// Returns whatever [`StoreError`] `op` returns.
    pub async fn mutate<T, F>(&self, op: F) -> Result<Persisted<T>, StoreError>
    where
        F: FnOnce(&mut OccupancyStore) -> Result<T, StoreError>,
    {
        let mut store = self.store.write().await;
        let value = op(&mut store)?;

        let records = persist::capture(&store);
        let persist_error = self.snapshot_file.save(&records).await.err();
        if let Some(e) = &persist_error {
            warn!(
                path = %self.snapshot_file.path().display(),
                error = %e,
                "snapshot write failed, in-memory state kept"
            );
        }

        Ok(Persisted {
            value,
            persist_error,
        })
    }
}
