//! The authoritative occupancy store.
//!
//! Each lot keeps one boolean per physical space (`true` = occupied). Counts
//! are always derived from the bitmap, so they can never drift from it.
//!
//! The store is a plain value. The sync service wraps it in a lock and
//! writes a durable snapshot after every mutation; see
//! [`persist`](crate::persist).

use chrono::{DateTime, Utc};
use lotwatch_types::{LotDefinition, LotDetail, LotId, LotSummary};
use rand::Rng;

use crate::occupancy::draw_busy_count;

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No lot with this identifier exists.
    #[error("lot not found: {0}")]
    NotFound(LotId),

    /// The space index does not address a space of the lot.
    #[error("space index {index} out of range for lot {lot_id} (capacity {capacity})")]
    OutOfRange {
        /// The lot that was addressed.
        lot_id: LotId,
        /// The requested index.
        index: usize,
        /// The lot's capacity.
        capacity: u32,
    },
}

/// One lot's definition and space bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotState {
    definition: LotDefinition,
    spaces: Vec<bool>,
}

impl LotState {
    /// A lot with every space empty.
    fn empty(definition: LotDefinition) -> Self {
        let spaces = vec![false; space_count(definition.capacity())];
        Self { definition, spaces }
    }

    /// The lot's fixed definition.
    pub const fn definition(&self) -> &LotDefinition {
        &self.definition
    }

    /// Per-space occupancy, one entry per space.
    pub fn spaces(&self) -> &[bool] {
        &self.spaces
    }

    /// Number of occupied spaces.
    pub fn occupied(&self) -> u32 {
        let count = self.spaces.iter().filter(|occupied| **occupied).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Number of free spaces.
    pub fn available(&self) -> u32 {
        self.definition.capacity().saturating_sub(self.occupied())
    }

    /// Aggregated view stamped with `now`.
    pub fn summary(&self, now: DateTime<Utc>) -> LotSummary {
        let def = &self.definition;
        LotSummary {
            lot_id: def.id().clone(),
            name: def.name().to_owned(),
            total_spaces: def.capacity(),
            occupied_spaces: self.occupied(),
            available_spaces: self.available(),
            permit_type: def.permit(),
            drive_time: def.drive_time(),
            walk_time: def.walk_time(),
            last_update: now,
        }
    }

    /// Aggregated view plus the bitmap.
    pub fn detail(&self, now: DateTime<Utc>) -> LotDetail {
        LotDetail {
            summary: self.summary(now),
            spaces: self.spaces.clone(),
        }
    }
}

/// The authoritative set of lots, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyStore {
    lots: Vec<LotState>,
}

impl OccupancyStore {
    /// Create a store with every space of every lot empty.
    pub fn new(catalog: Vec<LotDefinition>) -> Self {
        Self {
            lots: catalog.into_iter().map(LotState::empty).collect(),
        }
    }

    /// All lots, in catalog order.
    pub fn lots(&self) -> &[LotState] {
        &self.lots
    }

    /// Look up one lot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn lot(&self, id: &LotId) -> Result<&LotState, StoreError> {
        self.lots
            .iter()
            .find(|lot| lot.definition.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn lot_mut(&mut self, id: &LotId) -> Result<&mut LotState, StoreError> {
        self.lots
            .iter_mut()
            .find(|lot| lot.definition.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Aggregated views of every lot, in catalog order.
    pub fn summaries(&self, now: DateTime<Utc>) -> Vec<LotSummary> {
        self.lots.iter().map(|lot| lot.summary(now)).collect()
    }

    /// Aggregated view of one lot, bitmap included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn detail(&self, id: &LotId, now: DateTime<Utc>) -> Result<LotDetail, StoreError> {
        self.lot(id).map(|lot| lot.detail(now))
    }

    /// Flip one space and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown lot and
    /// [`StoreError::OutOfRange`] if `index >= capacity`.
    pub fn toggle(&mut self, id: &LotId, index: usize) -> Result<bool, StoreError> {
        let lot = self.lot_mut(id)?;
        let capacity = lot.definition.capacity();
        let space = lot
            .spaces
            .get_mut(index)
            .ok_or_else(|| StoreError::OutOfRange {
                lot_id: id.clone(),
                index,
                capacity,
            })?;
        *space = !*space;
        Ok(*space)
    }

    /// Mark every space of a lot empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn reset(&mut self, id: &LotId) -> Result<(), StoreError> {
        self.lot_mut(id)?.spaces.fill(false);
        Ok(())
    }

    /// Mark every space of a lot occupied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn fill(&mut self, id: &LotId) -> Result<(), StoreError> {
        self.lot_mut(id)?.spaces.fill(true);
        Ok(())
    }

    /// Clear a lot, then occupy exactly `occupied` distinct spaces chosen
    /// uniformly at random.
    ///
    /// Counts above capacity are clamped to capacity. Returns the resulting
    /// occupied count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn randomize(
        &mut self,
        id: &LotId,
        occupied: u32,
        rng: &mut impl Rng,
    ) -> Result<u32, StoreError> {
        let lot = self.lot_mut(id)?;
        let len = lot.spaces.len();
        let wanted = space_count(occupied).min(len);

        lot.spaces.fill(false);
        for index in rand::seq::index::sample(rng, len, wanted) {
            if let Some(space) = lot.spaces.get_mut(index) {
                *space = true;
            }
        }
        Ok(lot.occupied())
    }

    /// Randomize a lot with a count drawn from its busy range.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn randomize_realistic(&mut self, id: &LotId, rng: &mut impl Rng) -> Result<u32, StoreError> {
        let range = self.lot(id)?.definition.busy_range();
        let occupied = draw_busy_count(range, rng);
        self.randomize(id, occupied, rng)
    }

    /// Replace a lot's bitmap, padding with empty spaces or truncating so
    /// the length matches capacity. Returns `true` if the bitmap had to be
    /// resized.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn load_bitmap(&mut self, id: &LotId, mut spaces: Vec<bool>) -> Result<bool, StoreError> {
        let lot = self.lot_mut(id)?;
        let expected = space_count(lot.definition.capacity());
        let resized = spaces.len() != expected;
        spaces.resize(expected, false);
        lot.spaces = spaces;
        Ok(resized)
    }
}

/// Capacity as a bitmap length.
fn space_count(capacity: u32) -> usize {
    usize::try_from(capacity).unwrap_or(usize::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lotwatch_types::default_catalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn store() -> OccupancyStore {
        OccupancyStore::new(default_catalog())
    }

    fn id(s: &str) -> LotId {
        LotId::from(s)
    }

    #[test]
    fn new_store_is_empty_in_catalog_order() {
        let store = store();
        let summaries = store.summaries(Utc::now());
        let ids: Vec<&str> = summaries.iter().map(|s| s.lot_id.as_str()).collect();
        assert_eq!(ids, ["17", "18", "19", "14"]);
        for summary in &summaries {
            assert_eq!(summary.occupied_spaces, 0);
            assert_eq!(summary.available_spaces, summary.total_spaces);
        }
    }

    #[test]
    fn toggle_flips_and_is_its_own_inverse() {
        let mut store = store();
        let before = store.lot(&id("17")).unwrap().spaces().to_vec();

        assert!(store.toggle(&id("17"), 4).unwrap());
        assert_eq!(store.lot(&id("17")).unwrap().occupied(), 1);
        assert!(!store.toggle(&id("17"), 4).unwrap());

        assert_eq!(store.lot(&id("17")).unwrap().spaces(), before.as_slice());
    }

    #[test]
    fn toggle_rejects_index_at_capacity() {
        let mut store = store();
        let err = store.toggle(&id("17"), 35).unwrap_err();
        assert_eq!(
            err,
            StoreError::OutOfRange {
                lot_id: id("17"),
                index: 35,
                capacity: 35
            }
        );
        assert!(store.toggle(&id("17"), 34).is_ok());
    }

    #[test]
    fn unknown_lot_is_not_found_everywhere() {
        let mut store = store();
        let mut rng = SmallRng::seed_from_u64(3);
        let missing = id("99");
        assert!(matches!(store.lot(&missing), Err(StoreError::NotFound(_))));
        assert!(matches!(store.detail(&missing, Utc::now()), Err(StoreError::NotFound(_))));
        assert!(matches!(store.toggle(&missing, 0), Err(StoreError::NotFound(_))));
        assert!(matches!(store.reset(&missing), Err(StoreError::NotFound(_))));
        assert!(matches!(store.fill(&missing), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.randomize(&missing, 1, &mut rng),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn fill_then_reset() {
        let mut store = store();
        store.fill(&id("18")).unwrap();
        let lot = store.lot(&id("18")).unwrap();
        assert_eq!(lot.occupied(), 45);
        assert_eq!(lot.available(), 0);

        store.reset(&id("18")).unwrap();
        assert_eq!(store.lot(&id("18")).unwrap().occupied(), 0);
    }

    #[test]
    fn randomize_sets_exactly_k_spaces() {
        let mut store = store();
        let mut rng = SmallRng::seed_from_u64(42);
        store.fill(&id("19")).unwrap();

        for k in 0..=60 {
            let applied = store.randomize(&id("19"), k, &mut rng).unwrap();
            let lot = store.lot(&id("19")).unwrap();
            assert_eq!(applied, k);
            assert_eq!(lot.occupied(), k);
            assert_eq!(lot.available(), 60 - k);
        }
    }

    #[test]
    fn randomize_clamps_to_capacity() {
        let mut store = store();
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(store.randomize(&id("17"), 500, &mut rng).unwrap(), 35);
    }

    #[test]
    fn realistic_randomize_uses_busy_range() {
        let mut store = store();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let occupied = store.randomize_realistic(&id("18"), &mut rng).unwrap();
            assert!((40..=45).contains(&occupied));
        }
    }

    #[test]
    fn load_bitmap_normalizes_length() {
        let mut store = store();
        assert!(!store.load_bitmap(&id("17"), vec![true; 35]).unwrap());
        assert_eq!(store.lot(&id("17")).unwrap().occupied(), 35);

        assert!(store.load_bitmap(&id("17"), vec![true; 3]).unwrap());
        let lot = store.lot(&id("17")).unwrap();
        assert_eq!(lot.spaces().len(), 35);
        assert_eq!(lot.occupied(), 3);

        assert!(store.load_bitmap(&id("17"), vec![true; 40]).unwrap());
        assert_eq!(store.lot(&id("17")).unwrap().occupied(), 35);
    }

    #[test]
    fn detail_includes_bitmap() {
        let mut store = store();
        store.toggle(&id("14"), 0).unwrap();
        let detail = store.detail(&id("14"), Utc::now()).unwrap();
        assert_eq!(detail.spaces.len(), 50);
        assert_eq!(detail.spaces.first(), Some(&true));
        assert_eq!(detail.summary.occupied_spaces, 1);
        assert_eq!(detail.summary.available_spaces, 49);
    }
}
