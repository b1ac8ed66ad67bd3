//! The aggregate one pipeline invocation produces

use serde::{Deserialize, Serialize};

use super::{Coordinate, NearbyPlace, WeatherSample};

/// A nearby place together with its fetched weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NearbyWeather {
    pub place: NearbyPlace,
    pub weather: WeatherSample,
}

/// Origin weather plus the nearby places whose weather loaded, in distance order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedView {
    pub origin_name: String,
    pub origin: Coordinate,
    pub origin_weather: WeatherSample,
    pub nearby: Vec<NearbyWeather>,
}

impl ResolvedView {
    /// All rendered points, origin first, then nearby in distance order
    pub fn points(&self) -> impl Iterator<Item = (Coordinate, &WeatherSample)> {
        std::iter::once((self.origin, &self.origin_weather)).chain(
            self.nearby
                .iter()
                .map(|entry| (entry.place.coordinate, &entry.weather)),
        )
    }
}
