//! Place models produced by text search and nearby search

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One ranked search result, used for suggestions or to trigger resolution
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// A settlement near a search origin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NearbyPlace {
    /// Short name (first segment of the provider's display name)
    pub name: String,
    pub coordinate: Coordinate,
    /// Great-circle distance from the search origin in kilometers
    pub distance_km: f64,
}

impl NearbyPlace {
    /// Marker title, e.g. "Augsburg (57 km)"
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} ({} km)", self.name, self.distance_km.round() as i64)
    }
}
