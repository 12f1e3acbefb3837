//! Occupied-count helpers shared by the authoritative store and client mirrors.

use lotwatch_types::OccupancyRange;
use rand::Rng;

/// What happened to a requested occupied count.
///
/// Writes outside `0..=capacity` are never rejected; they are clamped and
/// reported as [`OccupancyWrite::Clamped`] so the caller can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyWrite {
    /// The requested count was applied unchanged.
    Exact(u32),
    /// The requested count was out of range and was clamped.
    Clamped {
        /// The count the caller asked for.
        requested: i64,
        /// The count actually stored.
        applied: u32,
    },
}

impl OccupancyWrite {
    /// The count that was stored.
    pub const fn applied(self) -> u32 {
        match self {
            Self::Exact(applied) | Self::Clamped { applied, .. } => applied,
        }
    }

    /// Whether the requested count had to be corrected.
    pub const fn was_clamped(self) -> bool {
        matches!(self, Self::Clamped { .. })
    }
}

/// Clamp `requested` into `0..=capacity`.
pub fn clamp_occupied(requested: i64, capacity: u32) -> OccupancyWrite {
    let bounded = requested.clamp(0, i64::from(capacity));
    let applied = u32::try_from(bounded).unwrap_or(capacity);
    if i64::from(applied) == requested {
        OccupancyWrite::Exact(applied)
    } else {
        OccupancyWrite::Clamped { requested, applied }
    }
}

/// Draw an occupied count uniformly from `range` (inclusive).
///
/// `range` must be ordered; [`LotDefinition`](lotwatch_types::LotDefinition)
/// rejects inverted ranges at construction. An inverted range yields
/// `range.max` in release builds.
pub fn draw_busy_count(range: OccupancyRange, rng: &mut impl Rng) -> u32 {
    debug_assert!(
        range.min <= range.max,
        "inverted busy range {}..={}",
        range.min,
        range.max
    );
    if range.min > range.max {
        return range.max;
    }
    rng.random_range(range.min..=range.max)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn in_range_writes_are_exact() {
        assert_eq!(clamp_occupied(0, 35), OccupancyWrite::Exact(0));
        assert_eq!(clamp_occupied(35, 35), OccupancyWrite::Exact(35));
        assert!(!clamp_occupied(12, 35).was_clamped());
    }

    #[test]
    fn negative_writes_clamp_to_zero() {
        let write = clamp_occupied(-10, 35);
        assert_eq!(
            write,
            OccupancyWrite::Clamped {
                requested: -10,
                applied: 0
            }
        );
        assert_eq!(write.applied(), 0);
    }

    #[test]
    fn oversized_writes_clamp_to_capacity() {
        let write = clamp_occupied(85, 35);
        assert!(write.was_clamped());
        assert_eq!(write.applied(), 35);
    }

    #[test]
    fn busy_draws_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = OccupancyRange::new(15, 40);
        for _ in 0..500 {
            assert!(range.contains(draw_busy_count(range, &mut rng)));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "inverted busy range")]
    fn inverted_range_is_caught_in_debug() {
        let mut rng = SmallRng::seed_from_u64(1);
        draw_busy_count(OccupancyRange::new(10, 5), &mut rng);
    }

    #[test]
    fn degenerate_range_returns_its_bound() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(draw_busy_count(OccupancyRange::new(9, 9), &mut rng), 9);
    }
}
