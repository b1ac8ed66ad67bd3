//! Plain-text renderer for the command line

use std::io::{self, Write};

use super::{CardPanel, HeatOverlay, MapSurface, Marker};
use crate::models::{Coordinate, NearbyPlace, WeatherSample};

/// Writes map and card updates as lines of text
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    markers: usize,
}

impl TerminalSurface<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, markers: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> MapSurface for TerminalSurface<W> {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.emit(&format!(
            "🗺️  Map centered on {} (zoom {zoom})",
            center.format_coordinates()
        ));
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.markers += 1;
        tracing::debug!("Marker {} at {:?}: {}", self.markers, marker.coordinate, marker.popup);
    }

    fn remove_all_markers(&mut self) {
        self.markers = 0;
    }

    fn set_heat_overlay(&mut self, overlay: &HeatOverlay) {
        self.emit(&format!(
            "🌡️  Heat overlay: {} points, {} markers (scale max {}°C)",
            overlay.points.len(),
            self.markers,
            overlay.options.max_temperature
        ));
    }

    fn remove_heat_overlay(&mut self) {}
}

impl<W: Write + Send> CardPanel for TerminalSurface<W> {
    fn show_main(&mut self, name: &str, weather: &WeatherSample) {
        self.emit(&format!(
            "📍 {name} [{}]\n   Temperature: {}\n   Conditions: {}\n   Humidity: {}\n   Wind Speed: {}",
            weather.temperature_class().as_str(),
            weather.format_temperature(),
            weather.description,
            weather.format_humidity(),
            weather.format_wind()
        ));
    }

    fn push_nearby(&mut self, place: &NearbyPlace, weather: &WeatherSample) {
        self.emit(&format!(
            "   • {}: {}, {} [{}]",
            place.title(),
            weather.format_temperature(),
            weather.description,
            weather.temperature_class().as_str()
        ));
    }

    fn clear_nearby(&mut self) {}

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("❌ {message}"));
    }
}
