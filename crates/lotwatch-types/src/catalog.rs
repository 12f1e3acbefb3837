//! Lot definitions and the fixed catalog.
//!
//! Lots are defined once at process start and never created or destroyed at
//! runtime. The order of [`default_catalog`] is the recommendation priority
//! order: the first lot a requester may use is the top pick.

use crate::enums::PermitClass;
use crate::ids::LotId;

/// Errors raised when a lot definition is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Capacity must be at least one space.
    #[error("lot {lot_id}: capacity must be positive")]
    ZeroCapacity {
        /// The offending lot.
        lot_id: LotId,
    },

    /// The busy range is inverted or exceeds capacity.
    #[error("lot {lot_id}: busy range {min}..={max} does not fit capacity {capacity}")]
    InvalidBusyRange {
        /// The offending lot.
        lot_id: LotId,
        /// Lower bound of the range.
        min: u32,
        /// Upper bound of the range.
        max: u32,
        /// Lot capacity.
        capacity: u32,
    },
}

/// Inclusive range of occupied-space counts typical for a lot.
///
/// Used to draw realistic randomized occupancy on the server and synthetic
/// counts on a client that cannot reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OccupancyRange {
    /// Fewest occupied spaces.
    pub min: u32,
    /// Most occupied spaces.
    pub max: u32,
}

impl OccupancyRange {
    /// Create a range. Bounds are checked by [`LotDefinition::new`].
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `count` falls inside the range.
    pub const fn contains(&self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }

    /// Whether the range is ordered and lies within `0..=capacity`.
    pub const fn fits(&self, capacity: u32) -> bool {
        self.min <= self.max && self.max <= capacity
    }
}

/// Immutable description of one parking lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotDefinition {
    id: LotId,
    name: String,
    capacity: u32,
    permit: PermitClass,
    drive_time: u32,
    walk_time: u32,
    busy_range: OccupancyRange,
}

impl LotDefinition {
    /// Create a validated lot definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ZeroCapacity`] for a zero capacity and
    /// [`CatalogError::InvalidBusyRange`] if `busy_range` is inverted or
    /// reaches past `capacity`.
    pub fn new(
        id: LotId,
        name: impl Into<String>,
        capacity: u32,
        permit: PermitClass,
        drive_time: u32,
        walk_time: u32,
        busy_range: OccupancyRange,
    ) -> Result<Self, CatalogError> {
        let definition = Self {
            id,
            name: name.into(),
            capacity,
            permit,
            drive_time,
            walk_time,
            busy_range,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Check the capacity and busy range invariants.
    ///
    /// # Errors
    ///
    /// See [`LotDefinition::new`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.capacity == 0 {
            return Err(CatalogError::ZeroCapacity {
                lot_id: self.id.clone(),
            });
        }
        let range = self.busy_range;
        if !range.fits(self.capacity) {
            return Err(CatalogError::InvalidBusyRange {
                lot_id: self.id.clone(),
                min: range.min,
                max: range.max,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Lot identifier.
    pub const fn id(&self) -> &LotId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical spaces.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Who may park here.
    pub const fn permit(&self) -> PermitClass {
        self.permit
    }

    /// Drive time from campus entrance, in minutes.
    pub const fn drive_time(&self) -> u32 {
        self.drive_time
    }

    /// Walk time to the destination building, in minutes.
    pub const fn walk_time(&self) -> u32 {
        self.walk_time
    }

    /// Realistic occupied-count range.
    pub const fn busy_range(&self) -> OccupancyRange {
        self.busy_range
    }
}

/// One row of the built-in catalog.
struct CatalogEntry {
    id: &'static str,
    capacity: u32,
    permit: PermitClass,
    drive_time: u32,
    walk_time: u32,
    busy: OccupancyRange,
}

/// Built-in lot table, in priority order.
const CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        id: "17",
        capacity: 35,
        permit: PermitClass::StudentOnly,
        drive_time: 2,
        walk_time: 4,
        busy: OccupancyRange::new(28, 35),
    },
    CatalogEntry {
        id: "18",
        capacity: 45,
        permit: PermitClass::StaffOnly,
        drive_time: 1,
        walk_time: 3,
        busy: OccupancyRange::new(40, 45),
    },
    CatalogEntry {
        id: "19",
        capacity: 60,
        permit: PermitClass::StudentOrStaff,
        drive_time: 2,
        walk_time: 5,
        busy: OccupancyRange::new(45, 60),
    },
    CatalogEntry {
        id: "14",
        capacity: 50,
        permit: PermitClass::Open,
        drive_time: 3,
        walk_time: 7,
        busy: OccupancyRange::new(15, 40),
    },
];

/// Same rules as [`LotDefinition::validate`], usable in const context.
const fn entries_valid(entries: &[CatalogEntry]) -> bool {
    match entries {
        [] => true,
        [first, rest @ ..] => {
            first.capacity > 0 && first.busy.fits(first.capacity) && entries_valid(rest)
        }
    }
}

// A bad built-in entry fails the build.
const _: () = assert!(entries_valid(&CATALOG), "built-in lot catalog is invalid");

/// The four lots near the ELC building, in priority order.
///
/// Entries are checked by `entries_valid` at compile time.
pub fn default_catalog() -> Vec<LotDefinition> {
    CATALOG
        .iter()
        .map(|entry| LotDefinition {
            id: LotId::from(entry.id),
            name: format!("Lot {}", entry.id),
            capacity: entry.capacity,
            permit: entry.permit,
            drive_time: entry.drive_time,
            walk_time: entry.walk_time,
            busy_range: entry.busy,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 4);
        for lot in &catalog {
            assert!(lot.validate().is_ok(), "invalid catalog entry {}", lot.id());
        }
        let ids: Vec<&str> = catalog.iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, ["17", "18", "19", "14"]);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = LotDefinition::new(
            LotId::from("99"),
            "Lot 99",
            0,
            PermitClass::Open,
            1,
            1,
            OccupancyRange::new(0, 0),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ZeroCapacity { .. }));
    }

    #[test]
    fn busy_range_must_fit_capacity() {
        let err = LotDefinition::new(
            LotId::from("99"),
            "Lot 99",
            10,
            PermitClass::Open,
            1,
            1,
            OccupancyRange::new(5, 11),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBusyRange { .. }));

        let inverted = LotDefinition::new(
            LotId::from("99"),
            "Lot 99",
            10,
            PermitClass::Open,
            1,
            1,
            OccupancyRange::new(6, 5),
        );
        assert!(inverted.is_err());
    }

    #[test]
    fn const_check_rejects_bad_entries() {
        let zero = [CatalogEntry {
            id: "99",
            capacity: 0,
            permit: PermitClass::Open,
            drive_time: 1,
            walk_time: 1,
            busy: OccupancyRange::new(0, 0),
        }];
        assert!(!entries_valid(&zero));

        let inverted = [CatalogEntry {
            id: "99",
            capacity: 10,
            permit: PermitClass::Open,
            drive_time: 1,
            walk_time: 1,
            busy: OccupancyRange::new(6, 5),
        }];
        assert!(!entries_valid(&inverted));
        assert!(entries_valid(&CATALOG));
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = OccupancyRange::new(28, 35);
        assert!(range.contains(28));
        assert!(range.contains(35));
        assert!(!range.contains(27));
        assert!(!range.contains(36));
    }
}
