//! Client-side mirror of lot occupancy.
//!
//! A client keeps only counts, never bitmaps. Every refresh produces a new
//! [`MirrorSnapshot`] instead of editing the previous one in place, so a
//! reader holding an `Arc<MirrorSnapshot>` never sees a half-applied update.

use chrono::{DateTime, Utc};
use lotwatch_types::{LotDefinition, LotId, LotStatus, LotSummary, PermitClass};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::Permitted;
use crate::occupancy::{OccupancyWrite, clamp_occupied, draw_busy_count};
use crate::status::classify;

/// Where the counts in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// The last fetch from the sync service succeeded.
    Connected,
    /// The last fetch failed; counts are synthetic.
    Disconnected,
}

impl ConnectionState {
    /// Short source label for presentation (`server` / `simulated`).
    pub const fn source_label(self) -> &'static str {
        match self {
            Self::Connected => "server",
            Self::Disconnected => "simulated",
        }
    }
}

/// One lot as seen by a client: its definition and an occupied count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredLot {
    definition: LotDefinition,
    occupied: u32,
}

impl MirroredLot {
    /// An empty lot.
    pub const fn new(definition: LotDefinition) -> Self {
        Self {
            definition,
            occupied: 0,
        }
    }

    /// Set the occupied count, clamped into `0..=capacity`.
    pub fn set_occupied_count(&mut self, requested: i64) -> OccupancyWrite {
        let write = clamp_occupied(requested, self.definition.capacity());
        self.occupied = write.applied();
        write
    }

    /// The lot's fixed definition.
    pub const fn definition(&self) -> &LotDefinition {
        &self.definition
    }

    /// Occupied spaces.
    pub const fn occupied(&self) -> u32 {
        self.occupied
    }

    /// Free spaces.
    pub const fn available(&self) -> u32 {
        self.definition.capacity().saturating_sub(self.occupied)
    }

    /// Availability status.
    pub fn status(&self) -> LotStatus {
        classify(self.occupied, self.definition.capacity())
    }
}

impl Permitted for MirroredLot {
    fn permit(&self) -> PermitClass {
        self.definition.permit()
    }
}

/// Immutable point-in-time view of every catalog lot held by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSnapshot {
    lots: Vec<MirroredLot>,
    state: ConnectionState,
    refreshed_at: Option<DateTime<Utc>>,
}

impl MirrorSnapshot {
    /// Initial snapshot before any fetch: every lot empty, disconnected.
    pub fn new(catalog: Vec<LotDefinition>) -> Self {
        Self {
            lots: catalog.into_iter().map(MirroredLot::new).collect(),
            state: ConnectionState::Disconnected,
            refreshed_at: None,
        }
    }

    /// A new connected snapshot carrying the server's counts.
    ///
    /// Server entries for lots outside the catalog are ignored; catalog lots
    /// the server did not report keep their previous count.
    pub fn apply_live(&self, summaries: &[LotSummary], at: DateTime<Utc>) -> Self {
        let mut lots = self.lots.clone();
        for summary in summaries {
            let Some(lot) = lots
                .iter_mut()
                .find(|lot| lot.definition.id() == &summary.lot_id)
            else {
                debug!(lot_id = %summary.lot_id, "ignoring lot outside the local catalog");
                continue;
            };
            let write = lot.set_occupied_count(i64::from(summary.occupied_spaces));
            if let OccupancyWrite::Clamped { requested, applied } = write {
                debug!(lot_id = %summary.lot_id, requested, applied, "server count clamped");
            }
        }
        Self {
            lots,
            state: ConnectionState::Connected,
            refreshed_at: Some(at),
        }
    }

    /// A new disconnected snapshot with counts drawn from each lot's busy range.
    pub fn apply_synthetic(&self, rng: &mut impl Rng, at: DateTime<Utc>) -> Self {
        let mut lots = self.lots.clone();
        for lot in &mut lots {
            let drawn = draw_busy_count(lot.definition.busy_range(), rng);
            lot.set_occupied_count(i64::from(drawn));
        }
        Self {
            lots,
            state: ConnectionState::Disconnected,
            refreshed_at: Some(at),
        }
    }

    /// Lots in catalog order.
    pub fn lots(&self) -> &[MirroredLot] {
        &self.lots
    }

    /// Look up one lot.
    pub fn lot(&self, id: &LotId) -> Option<&MirroredLot> {
        self.lots.iter().find(|lot| lot.definition.id() == id)
    }

    /// Whether the counts came from the server.
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// When this snapshot was produced; `None` before the first refresh.
    pub const fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
