//! Lot identifiers.
//!
//! Lots are addressed by short stable strings (`"17"`, `"14"`) rather than
//! generated IDs: the catalog is fixed and the identifiers appear verbatim in
//! URLs and in the durable snapshot file.

use serde::{Deserialize, Serialize};

/// Stable identifier of a parking lot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(String);

impl LotId {
    /// Create a lot identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LotId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for LotId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let id = LotId::from("17");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
        let back: LotId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn displays_inner_value() {
        assert_eq!(LotId::new("19").to_string(), "19");
    }
}
