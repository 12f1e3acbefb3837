//! JSON bodies exchanged over the sync service API.
//!
//! Field names match the API consumed by existing clients (`lot_id`,
//! `total_spaces`, `occupied_spaces`, ...), so these structs double as the
//! client-side decoding types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::PermitClass;
use crate::ids::LotId;

/// Aggregated, point-in-time view of one lot.
///
/// Recomputed on every request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSummary {
    /// Lot identifier.
    pub lot_id: LotId,
    /// Display name.
    pub name: String,
    /// Capacity.
    pub total_spaces: u32,
    /// Occupied spaces.
    pub occupied_spaces: u32,
    /// Free spaces (`total_spaces - occupied_spaces`).
    pub available_spaces: u32,
    /// Access rule.
    pub permit_type: PermitClass,
    /// Drive time in minutes.
    pub drive_time: u32,
    /// Walk time in minutes.
    pub walk_time: u32,
    /// When this view was computed. Timestamps without an offset are read
    /// as UTC.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_update: DateTime<Utc>,
}

/// Accept RFC 3339 timestamps as well as offset-less ISO 8601 local times
/// such as `2026-01-01T08:00:00.123456`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid last_update {raw:?}: {e}")))
}

/// A [`LotSummary`] plus the full per-space bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDetail {
    /// Aggregated counts.
    #[serde(flatten)]
    pub summary: LotSummary,
    /// One entry per space, `true` when occupied.
    pub spaces: Vec<bool>,
}

/// Result of `POST /api/lot/{id}/toggle/{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// Lot that was changed.
    pub lot_id: LotId,
    /// Space that was flipped.
    pub space_index: usize,
    /// New state of that space.
    pub occupied: bool,
    /// Occupied spaces after the flip.
    pub occupied_count: u32,
    /// Free spaces after the flip.
    pub available_count: u32,
    /// Whether the durable snapshot was written.
    pub persisted: bool,
    /// Why the durable snapshot could not be written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of `POST /api/lot/{id}/reset` and `POST /api/lot/{id}/fill`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// Lot that was changed.
    pub lot_id: LotId,
    /// Confirmation text.
    pub message: String,
    /// Whether the durable snapshot was written.
    pub persisted: bool,
    /// Why the durable snapshot could not be written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of `POST /api/lot/{id}/random`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizeOutcome {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// Lot that was changed.
    pub lot_id: LotId,
    /// Occupied spaces after randomizing.
    pub occupied_count: u32,
    /// Free spaces after randomizing.
    pub available_count: u32,
    /// Whether the durable snapshot was written.
    pub persisted: bool,
    /// Why the durable snapshot could not be written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_summary() -> LotSummary {
        LotSummary {
            lot_id: LotId::from("17"),
            name: String::from("Lot 17"),
            total_spaces: 35,
            occupied_spaces: 10,
            available_spaces: 25,
            permit_type: PermitClass::StudentOnly,
            drive_time: 2,
            walk_time: 4,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn detail_flattens_summary_fields() {
        let detail = LotDetail {
            summary: sample_summary(),
            spaces: vec![true, false],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["lot_id"], "17");
        assert_eq!(json["permit_type"], "Student");
        assert_eq!(json["spaces"][0], true);
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn warning_omitted_when_persisted() {
        let outcome = BulkOutcome {
            success: true,
            lot_id: LotId::from("14"),
            message: String::from("All spaces cleared"),
            persisted: true,
            warning: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn decodes_summary_without_extra_fields() {
        let raw = serde_json::json!({
            "lot_id": "18",
            "name": "Lot 18",
            "total_spaces": 45,
            "occupied_spaces": 40,
            "available_spaces": 5,
            "permit_type": "Staff",
            "drive_time": 1,
            "walk_time": 3,
            "last_update": "2026-01-01T08:00:00Z"
        });
        let summary: LotSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.permit_type, PermitClass::StaffOnly);
        assert_eq!(summary.occupied_spaces, 40);
    }

    #[test]
    fn decodes_timestamp_without_offset_as_utc() {
        let mut raw = serde_json::to_value(sample_summary()).unwrap();
        raw["last_update"] = serde_json::json!("2026-01-01T08:00:00.123456");
        let summary: LotSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            summary.last_update.to_rfc3339(),
            "2026-01-01T08:00:00.123456+00:00"
        );

        raw["last_update"] = serde_json::json!("2026-01-01T08:00:00");
        let summary: LotSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(summary.last_update.to_rfc3339(), "2026-01-01T08:00:00+00:00");

        raw["last_update"] = serde_json::json!("2026-01-01T10:00:00+02:00");
        let summary: LotSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(summary.last_update.to_rfc3339(), "2026-01-01T08:00:00+00:00");

        raw["last_update"] = serde_json::json!("yesterday");
        assert!(serde_json::from_value::<LotSummary>(raw).is_err());
    }
}
