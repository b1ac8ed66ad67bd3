//! Map rendering collaborators
//!
//! This module provides:
//! - The [`MapSurface`] and [`CardPanel`] traits the pipeline renders through
//! - Marker and heat-overlay values handed to the surface
//! - [`MapSession`], the single owner of markers, overlay and invocation generation
//! - A terminal renderer and a snapshot renderer used by the HTTP service

pub mod session;
pub mod snapshot;
pub mod terminal;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::models::{Coordinate, NearbyPlace, WeatherSample};

pub use session::{Generation, MapSession};
pub use snapshot::{MapSnapshot, SnapshotSurface};
pub use terminal::TerminalSurface;

/// Marker, viewport and overlay operations of a map widget
pub trait MapSurface: Send {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn add_marker(&mut self, marker: &Marker);
    fn remove_all_markers(&mut self);
    fn set_heat_overlay(&mut self, overlay: &HeatOverlay);
    fn remove_heat_overlay(&mut self);
}

/// Weather card rendering next to the map
pub trait CardPanel: Send {
    fn show_main(&mut self, name: &str, weather: &WeatherSample);
    fn push_nearby(&mut self, place: &NearbyPlace, weather: &WeatherSample);
    fn clear_nearby(&mut self);
    fn show_error(&mut self, message: &str);
}

/// A color-coded circle marker with a popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub color: String,
    pub popup: String,
}

impl Marker {
    /// Marker colored by temperature class, popup "{title} - {temp}°C"
    #[must_use]
    pub fn for_weather(coordinate: Coordinate, title: &str, weather: &WeatherSample) -> Self {
        Self {
            coordinate,
            color: weather.temperature_class().marker_color().to_string(),
            popup: format!("{} - {}", title, weather.format_temperature()),
        }
    }
}

/// One overlay point; the weight is the temperature in Celsius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

impl HeatPoint {
    /// `[lat, lng, weight]` as heat-layer widgets expect it
    #[must_use]
    pub fn as_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.weight]
    }

    /// Weight scaled into [0, 1] against the overlay maximum
    #[must_use]
    pub fn intensity(&self, max_temperature: f64) -> f64 {
        if max_temperature <= 0.0 {
            return 0.0;
        }
        (self.weight / max_temperature).clamp(0.0, 1.0)
    }
}

/// A batch of heat points plus rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatOverlay {
    pub points: Vec<HeatPoint>,
    pub options: OverlayConfig,
}

impl HeatOverlay {
    #[must_use]
    pub fn new<'a>(
        points: impl IntoIterator<Item = (Coordinate, &'a WeatherSample)>,
        options: OverlayConfig,
    ) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|(coordinate, weather)| HeatPoint {
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                    weight: weather.temperature,
                })
                .collect(),
            options,
        }
    }

    /// Gradient color for a point, nearest stop at or below its intensity
    #[must_use]
    pub fn color_for(&self, point: &HeatPoint) -> Option<&str> {
        let intensity = point.intensity(self.options.max_temperature);
        self.options
            .gradient
            .iter()
            .filter(|(stop, _)| *stop <= intensity)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, color)| color.as_str())
    }
}
