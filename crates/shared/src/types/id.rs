//! Typed identifiers for cash locations.
//!
//! Using a typed ID prevents accidentally passing an arbitrary label where a
//! location is expected.

use serde::{Deserialize, Serialize};

/// Front register 51.
pub const POS51: &str = "POS51";
/// Front register 52.
pub const POS52: &str = "POS52";
/// Petty cash box.
pub const PETTY_CASH: &str = "Petty Cash";
/// Back-office safe.
pub const SAFE: &str = "Safe";

/// Unique identifier for a cash location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Creates an ID from any string-like label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for LocationId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_display() {
        let id = LocationId::new("Petty Cash");
        assert_eq!(id.to_string(), "Petty Cash");
        assert_eq!(id.as_str(), "Petty Cash");
    }

    #[test]
    fn test_location_id_ordering_is_lexicographic() {
        let mut ids = vec![
            LocationId::from(SAFE),
            LocationId::from(POS52),
            LocationId::from(POS51),
        ];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(LocationId::as_str).collect();
        assert_eq!(sorted, vec![POS51, POS52, SAFE]);
    }

    #[test]
    fn test_location_id_serializes_transparently() {
        let id = LocationId::from("Safe");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Safe\"");

        let parsed: LocationId = serde_json::from_str("\"POS51\"").unwrap();
        assert_eq!(parsed, LocationId::from(POS51));
    }
}
