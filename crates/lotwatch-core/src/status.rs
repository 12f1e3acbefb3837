//! Availability classification.
//!
//! A lot is `Available` while at least 30% of its spaces are free, `Limited`
//! while some but fewer than 30% are free, and `Full` when none are. The
//! comparison is done in integers so the 30% boundary is exact.

use lotwatch_types::LotStatus;

/// Free-space percentage at or above which a lot counts as available.
const AVAILABLE_THRESHOLD_PERCENT: u64 = 30;

/// Classify a lot from its occupied count and capacity.
///
/// Occupied counts above capacity are treated as full. A zero capacity is
/// rejected when lots are defined; if one reaches here it reports `Full`.
pub fn classify(occupied: u32, capacity: u32) -> LotStatus {
    if capacity == 0 {
        return LotStatus::Full;
    }

    let available = u64::from(capacity.saturating_sub(occupied));
    if available == 0 {
        return LotStatus::Full;
    }

    let free_scaled = available.saturating_mul(100);
    let threshold_scaled = u64::from(capacity).saturating_mul(AVAILABLE_THRESHOLD_PERCENT);
    if free_scaled >= threshold_scaled {
        LotStatus::Available
    } else {
        LotStatus::Limited
    }
}
