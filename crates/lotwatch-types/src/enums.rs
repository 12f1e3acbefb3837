//! Enumeration types shared by the sync service and its clients.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Permit classes
// ---------------------------------------------------------------------------

/// The access rule attached to a lot.
///
/// Wire names follow the long-standing API values: `"Student"`, `"Staff"`,
/// `"Both"` and `"Open"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermitClass {
    /// Only requesters holding a student permit.
    #[serde(rename = "Student")]
    StudentOnly,
    /// Only requesters holding a staff permit.
    #[serde(rename = "Staff")]
    StaffOnly,
    /// Students and staff, but not visitors.
    #[serde(rename = "Both")]
    StudentOrStaff,
    /// Anyone, visitors included.
    #[serde(rename = "Open")]
    Open,
}

impl PermitClass {
    /// The wire name of this permit class.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudentOnly => "Student",
            Self::StaffOnly => "Staff",
            Self::StudentOrStaff => "Both",
            Self::Open => "Open",
        }
    }
}

impl core::fmt::Display for PermitClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Requester classes
// ---------------------------------------------------------------------------

/// The category of the person asking for recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequesterClass {
    /// Holds a student permit.
    Student,
    /// Holds a staff permit.
    Staff,
    /// Holds no permit.
    Visitor,
}

impl RequesterClass {
    /// Every requester class, in display order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Staff, Self::Visitor];

    /// Human-readable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Staff => "Staff",
            Self::Visitor => "Visitor",
        }
    }
}

impl core::fmt::Display for RequesterClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a requester class name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown requester class: {0} (expected student, staff or visitor)")]
pub struct ParseRequesterError(pub String);

impl core::str::FromStr for RequesterClass {
    type Err = ParseRequesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "staff" => Ok(Self::Staff),
            "visitor" => Ok(Self::Visitor),
            _ => Err(ParseRequesterError(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Lot status
// ---------------------------------------------------------------------------

/// Tri-state availability indicator derived from a lot's free ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotStatus {
    /// At least 30% of spaces are free.
    Available,
    /// Some spaces are free, but fewer than 30%.
    Limited,
    /// No free spaces.
    Full,
}

impl LotStatus {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Limited => "Limited",
            Self::Full => "Full",
        }
    }

    /// Suggested color for rendering this status (green, orange, red).
    pub const fn color_hint(self) -> &'static str {
        match self {
            Self::Available => "#4CAF50",
            Self::Limited => "#FFA726",
            Self::Full => "#EF5350",
        }
    }
}

impl core::fmt::Display for LotStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn permit_class_uses_legacy_wire_names() {
        let json = serde_json::to_string(&PermitClass::StudentOrStaff).unwrap();
        assert_eq!(json, "\"Both\"");
        let parsed: PermitClass = serde_json::from_str("\"Staff\"").unwrap();
        assert_eq!(parsed, PermitClass::StaffOnly);
        assert_eq!(PermitClass::StudentOnly.to_string(), "Student");
    }

    #[test]
    fn requester_class_parses_case_insensitively() {
        assert_eq!("Visitor".parse::<RequesterClass>(), Ok(RequesterClass::Visitor));
        assert_eq!(" STAFF ".parse::<RequesterClass>(), Ok(RequesterClass::Staff));
        assert!("faculty".parse::<RequesterClass>().is_err());
    }

    #[test]
    fn status_color_hints() {
        assert_eq!(LotStatus::Available.color_hint(), "#4CAF50");
        assert_eq!(LotStatus::Limited.color_hint(), "#FFA726");
        assert_eq!(LotStatus::Full.color_hint(), "#EF5350");
    }
}
