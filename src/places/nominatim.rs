//! Nominatim (OpenStreetMap) search and reverse geocoding.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{PlaceProvider, RawPlace, nearby_within_radius};
use crate::config::ProvidersConfig;
use crate::models::{Coordinate, NearbyPlace, PlaceCandidate};
use crate::{Result, WeatherMapError, http};

/// Nominatim API client
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: ClientWithMiddleware,
    base_url: String,
}

/// One entry of a `/search` response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResult {
    display_name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    #[serde(rename = "type")]
    place_type: Option<String>,
}

/// A `/reverse` response
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
}

impl SearchResult {
    /// Decode one array entry; entries of the wrong shape are skipped, not fatal
    fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value)
            .map_err(|e| debug!("Skipping unreadable search result: {}", e))
            .ok()
    }

    fn into_raw(self) -> Option<RawPlace> {
        let (Some(display_name), Some(lat), Some(lon)) = (self.display_name, self.lat, self.lon)
        else {
            debug!("Skipping search result without name or coordinates");
            return None;
        };

        match Coordinate::parse(&lat, &lon) {
            Ok(coordinate) => Some(RawPlace {
                display_name,
                coordinate,
                place_type: self.place_type,
            }),
            Err(e) => {
                debug!("Skipping result '{}': {}", display_name, e);
                None
            }
        }
    }
}

impl NominatimClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::with_client(
            http::api_client(config)?,
            config.geocoding_base_url.clone(),
        ))
    }

    pub fn with_client(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_search(&self, url: &str) -> Result<Vec<RawPlace>> {
        let results: Vec<serde_json::Value> = http::get_json(&self.client, url).await?;
        Ok(results
            .into_iter()
            .filter_map(SearchResult::from_value)
            .filter_map(SearchResult::into_raw)
            .collect())
    }

    fn search_url(&self, query: &str, limit: u32) -> String {
        format!(
            "{}/search?format=json&q={}&limit={}&addressdetails=1",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }

    fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, coordinate.latitude, coordinate.longitude
        )
    }

    fn nearby_url(&self, origin: Coordinate, radius_km: f64, limit: u32) -> String {
        format!(
            "{}/search?format=json&q=city&lat={}&lon={}&radius={}&limit={}&featuretype=city",
            self.base_url, origin.latitude, origin.longitude, radius_km, limit
        )
    }
}

#[async_trait::async_trait]
impl PlaceProvider for NominatimClient {
    #[instrument(level = "debug", skip(self))]
    async fn search_by_text(&self, query: &str, limit: u32) -> Vec<PlaceCandidate> {
        match self.fetch_search(&self.search_url(query, limit)).await {
            Ok(places) => {
                debug!("Search '{}' returned {} candidates", query, places.len());
                places
                    .into_iter()
                    .map(|place| PlaceCandidate {
                        display_name: place.display_name,
                        coordinate: place.coordinate,
                    })
                    .collect()
            }
            Err(e) => {
                warn!("Error searching places for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn reverse_lookup(&self, coordinate: Coordinate) -> Result<String> {
        let result: ReverseResult =
            http::get_json(&self.client, &self.reverse_url(coordinate)).await?;

        let name = result
            .display_name
            .ok_or_else(|| WeatherMapError::malformed("reverse response has no display_name"))?;
        info!("Reverse geocoded to: {}", name);
        Ok(name)
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_nearby(
        &self,
        origin: Coordinate,
        radius_km: f64,
        limit: u32,
    ) -> Vec<NearbyPlace> {
        match self.fetch_search(&self.nearby_url(origin, radius_km, limit)).await {
            Ok(places) => {
                let nearby = nearby_within_radius(origin, radius_km, places);
                info!("Found {} nearby settlements within {}km", nearby.len(), radius_km);
                nearby
            }
            Err(e) => {
                warn!("Error fetching nearby cities: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NominatimClient {
        NominatimClient::new(&ProvidersConfig::default()).unwrap()
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client().search_url("São Paulo, BR", 5);
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search?format=json&q=S%C3%A3o%20Paulo%2C%20BR&limit=5&addressdetails=1"
        );
    }

    #[test]
    fn test_nearby_url() {
        let url = client().nearby_url(Coordinate::new(48.1, 11.5).unwrap(), 100.0, 20);
        assert!(url.contains("q=city"));
        assert!(url.contains("lat=48.1&lon=11.5"));
        assert!(url.contains("radius=100&limit=20&featuretype=city"));
    }

    #[test]
    fn test_unparsable_coordinates_are_skipped() {
        let result = SearchResult {
            display_name: Some("Nowhere".to_string()),
            lat: Some(String::new()),
            lon: Some("11.5".to_string()),
            place_type: Some("city".to_string()),
        };
        assert!(result.into_raw().is_none());
    }

    #[test]
    fn test_incomplete_entries_are_skipped_individually() {
        let entries = vec![
            serde_json::json!({"display_name": "München", "lat": "48.137", "lon": "11.576", "type": "city"}),
            serde_json::json!({"display_name": "Broken", "lon": "11.0", "type": "city"}),
            serde_json::json!({"lat": "48.0", "lon": "11.0"}),
            serde_json::json!("not an object"),
        ];

        let raw: Vec<RawPlace> = entries
            .into_iter()
            .filter_map(SearchResult::from_value)
            .filter_map(SearchResult::into_raw)
            .collect();

        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].display_name, "München");
        assert_eq!(raw[0].place_type.as_deref(), Some("city"));
    }
}
