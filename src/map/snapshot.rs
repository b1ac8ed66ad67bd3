//! In-memory surface whose state is served to browser clients as JSON

use serde::{Deserialize, Serialize};

use super::{CardPanel, HeatOverlay, MapSurface, Marker};
use crate::models::{Coordinate, NearbyPlace, TemperatureClass, WeatherSample};

/// A rendered weather card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub temperature: String,
    pub conditions: String,
    pub class: TemperatureClass,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub distance: Option<String>,
}

/// Everything currently rendered on the map and card panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub center: Option<Coordinate>,
    pub zoom: Option<u8>,
    pub markers: Vec<Marker>,
    pub overlay: Option<HeatOverlay>,
    pub main: Option<Card>,
    pub nearby: Vec<Card>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SnapshotSurface {
    state: MapSnapshot,
}

impl SnapshotSurface {
    #[must_use]
    pub fn snapshot(&self) -> &MapSnapshot {
        &self.state
    }
}

impl MapSurface for SnapshotSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.state.center = Some(center);
        self.state.zoom = Some(zoom);
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.state.markers.push(marker.clone());
    }

    fn remove_all_markers(&mut self) {
        self.state.markers.clear();
    }

    fn set_heat_overlay(&mut self, overlay: &HeatOverlay) {
        self.state.overlay = Some(overlay.clone());
    }

    fn remove_heat_overlay(&mut self) {
        self.state.overlay = None;
    }
}

impl CardPanel for SnapshotSurface {
    fn show_main(&mut self, name: &str, weather: &WeatherSample) {
        self.state.error = None;
        self.state.main = Some(Card {
            title: name.to_string(),
            temperature: weather.format_temperature(),
            conditions: weather.description.clone(),
            class: weather.temperature_class(),
            humidity: Some(weather.format_humidity()),
            wind_speed: Some(weather.format_wind()),
            distance: None,
        });
    }

    fn push_nearby(&mut self, place: &NearbyPlace, weather: &WeatherSample) {
        self.state.nearby.push(Card {
            title: place.name.clone(),
            temperature: weather.format_temperature(),
            conditions: weather.description.clone(),
            class: weather.temperature_class(),
            humidity: None,
            wind_speed: None,
            distance: Some(format!("{} km", place.distance_km.round() as i64)),
        });
    }

    fn clear_nearby(&mut self) {
        self.state.nearby.clear();
    }

    fn show_error(&mut self, message: &str) {
        self.state.main = None;
        self.state.error = Some(message.to_string());
    }
}
