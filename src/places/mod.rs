//! Place resolution: text search, reverse lookup and nearby settlements
//!
//! [`PlaceProvider`] is the seam the pipeline resolves through;
//! [`nominatim::NominatimClient`] is the HTTP implementation.

use async_trait::async_trait;

use crate::Result;
use crate::geo;
use crate::models::{Coordinate, NearbyPlace, PlaceCandidate};

pub mod nominatim;

pub use nominatim::NominatimClient;

/// Place types accepted by the nearby search
pub const SETTLEMENT_TYPES: [&str; 2] = ["city", "town"];

/// Geocoding and nearby-settlement lookups
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Ranked candidates for a free-text query.
    ///
    /// Never fails: provider errors and empty results both yield an empty vector.
    async fn search_by_text(&self, query: &str, limit: u32) -> Vec<PlaceCandidate>;

    /// Descriptive name for a coordinate
    async fn reverse_lookup(&self, coordinate: Coordinate) -> Result<String>;

    /// Settlements within `radius_km` of `origin`, nearest first.
    ///
    /// Never fails: provider errors yield an empty vector so the origin can still render.
    async fn find_nearby(&self, origin: Coordinate, radius_km: f64, limit: u32)
    -> Vec<NearbyPlace>;
}

/// A raw settlement result before distance filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub place_type: Option<String>,
}

/// Keep cities and towns within the radius, annotate with distance, sort nearest first.
///
/// The provider's own radius filter is advisory, so distance is enforced here.
#[must_use]
pub fn nearby_within_radius(
    origin: Coordinate,
    radius_km: f64,
    places: impl IntoIterator<Item = RawPlace>,
) -> Vec<NearbyPlace> {
    let mut nearby: Vec<NearbyPlace> = places
        .into_iter()
        .filter(|place| {
            place
                .place_type
                .as_deref()
                .is_some_and(|t| SETTLEMENT_TYPES.contains(&t))
        })
        .map(|place| NearbyPlace {
            name: short_name(&place.display_name).to_string(),
            coordinate: place.coordinate,
            distance_km: geo::distance(origin, place.coordinate),
        })
        .filter(|place| place.distance_km <= radius_km)
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

/// First comma-separated segment of a display name
#[must_use]
pub fn short_name(display_name: &str) -> &str {
    display_name
        .split(',')
        .next()
        .map_or(display_name, str::trim)
}
