//! Presentation records handed to a rendering layer.

use chrono::{DateTime, TimeZone};
use lotwatch_core::{ConnectionState, MirrorSnapshot, MirroredLot, recommended};
use lotwatch_types::{LotId, LotStatus, RequesterClass};
use serde::Serialize;

/// One recommended lot, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationRecord {
    /// Position in the recommendation list, starting at 1.
    pub rank: u32,
    /// Lot identifier.
    pub id: LotId,
    /// Display name.
    pub name: String,
    /// Availability status.
    pub status: LotStatus,
    /// Suggested color for `status`.
    pub status_color_hint: &'static str,
    /// Free spaces.
    pub available_count: u32,
    /// Capacity.
    pub total_count: u32,
    /// Drive time in minutes.
    pub drive_time: u32,
}

impl PresentationRecord {
    fn from_lot(rank: u32, lot: &MirroredLot) -> Self {
        let def = lot.definition();
        let status = lot.status();
        Self {
            rank,
            id: def.id().clone(),
            name: def.name().to_owned(),
            status,
            status_color_hint: status.color_hint(),
            available_count: lot.available(),
            total_count: def.capacity(),
            drive_time: def.drive_time(),
        }
    }
}

/// Lots `requester` may use, in priority order, ranked from 1.
pub fn present(snapshot: &MirrorSnapshot, requester: RequesterClass) -> Vec<PresentationRecord> {
    (1..)
        .zip(recommended(requester, snapshot.lots()))
        .map(|(rank, lot)| PresentationRecord::from_lot(rank, lot))
        .collect()
}

/// "Last updated: 03:04:05 PM (server)", or "(simulated)" when the counts
/// are synthetic.
pub fn format_source_label<Tz>(state: ConnectionState, at: Option<DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let source = state.source_label();
    at.map_or_else(
        || format!("Not updated yet ({source})"),
        |at| format!("Last updated: {} ({source})", at.format("%I:%M:%S %p")),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use lotwatch_types::{LotSummary, default_catalog};

    use super::*;

    fn summary(id: &str, occupied: u32) -> LotSummary {
        let def = default_catalog()
            .into_iter()
            .find(|d| d.id().as_str() == id)
            .unwrap();
        LotSummary {
            lot_id: def.id().clone(),
            name: def.name().to_owned(),
            total_spaces: def.capacity(),
            occupied_spaces: occupied,
            available_spaces: def.capacity().saturating_sub(occupied),
            permit_type: def.permit(),
            drive_time: def.drive_time(),
            walk_time: def.walk_time(),
            last_update: Utc::now(),
        }
    }

    #[test]
    fn visitor_sees_only_open_lot() {
        let snapshot = MirrorSnapshot::new(default_catalog());
        let records = present(&snapshot, RequesterClass::Visitor);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "14");
        assert_eq!(records[0].rank, 1);
    }

    #[test]
    fn student_ranks_follow_priority() {
        let snapshot = MirrorSnapshot::new(default_catalog()).apply_live(
            &[summary("17", 32), summary("19", 60), summary("14", 10)],
            Utc::now(),
        );
        let records = present(&snapshot, RequesterClass::Student);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["17", "19", "14"]);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);

        assert_eq!(records[0].status, LotStatus::Limited);
        assert_eq!(records[0].status_color_hint, "#FFA726");
        assert_eq!(records[0].available_count, 3);
        assert_eq!(records[0].total_count, 35);
        assert_eq!(records[0].drive_time, 2);
        assert_eq!(records[1].status, LotStatus::Full);
        assert_eq!(records[2].status, LotStatus::Available);
    }

    #[test]
    fn source_label_formats() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap();
        assert_eq!(
            format_source_label(ConnectionState::Connected, Some(at)),
            "Last updated: 03:04:05 PM (server)"
        );
        assert_eq!(
            format_source_label(ConnectionState::Disconnected, Some(at)),
            "Last updated: 03:04:05 PM (simulated)"
        );
        assert_eq!(
            format_source_label::<Utc>(ConnectionState::Disconnected, None),
            "Not updated yet (simulated)"
        );
    }
}
