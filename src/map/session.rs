//! Map session: owns the rendered state of the current invocation

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CardPanel, HeatOverlay, MapSurface, Marker};
use crate::config::OverlayConfig;
use crate::models::{Coordinate, NearbyPlace, ResolvedView, WeatherSample};

/// Invocation number; only the latest generation may render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

/// Sole writer of the surface's markers and overlay
#[derive(Debug)]
pub struct MapSession<S> {
    surface: S,
    markers: Vec<Marker>,
    overlay: Option<HeatOverlay>,
    generation: Generation,
    overlay_config: OverlayConfig,
}

impl<S: MapSurface + CardPanel> MapSession<S> {
    pub fn new(surface: S, overlay_config: OverlayConfig) -> Self {
        Self {
            surface,
            markers: Vec::new(),
            overlay: None,
            generation: Generation(0),
            overlay_config,
        }
    }

    /// Start a new invocation: bump the generation and clear everything rendered
    pub fn begin(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.clear();
        debug!("Map session now at generation {}", self.generation.0);
        self.generation
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Remove markers, overlay and nearby cards
    pub fn clear(&mut self) {
        self.markers.clear();
        self.surface.remove_all_markers();
        if self.overlay.take().is_some() {
            self.surface.remove_heat_overlay();
        }
        self.surface.clear_nearby();
    }

    pub fn center_on(&mut self, center: Coordinate, zoom: u8) {
        self.surface.set_view(center, zoom);
    }

    pub fn show_origin(&mut self, name: &str, coordinate: Coordinate, weather: &WeatherSample) {
        self.surface.show_main(name, weather);
        self.add_marker(Marker::for_weather(coordinate, name, weather));
    }

    pub fn show_nearby(&mut self, place: &NearbyPlace, weather: &WeatherSample) {
        self.surface.push_nearby(place, weather);
        self.add_marker(Marker::for_weather(place.coordinate, &place.title(), weather));
    }

    pub fn show_error(&mut self, message: &str) {
        self.surface.show_error(message);
    }

    /// Replace the overlay with one batch built from the view's points
    pub fn set_overlay(&mut self, view: &ResolvedView) {
        let overlay = HeatOverlay::new(view.points(), self.overlay_config.clone());
        self.surface.set_heat_overlay(&overlay);
        self.overlay = Some(overlay);
    }

    /// Render a complete view in one pass, replacing whatever is shown
    pub fn render(&mut self, view: &ResolvedView) {
        self.clear();
        self.show_origin(&view.origin_name, view.origin, &view.origin_weather);
        for entry in &view.nearby {
            self.show_nearby(&entry.place, &entry.weather);
        }
        self.set_overlay(view);
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&HeatOverlay> {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn add_marker(&mut self, marker: Marker) {
        self.surface.add_marker(&marker);
        self.markers.push(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SnapshotSurface;
    use crate::models::NearbyWeather;
    use chrono::Utc;

    fn sample(temperature: f64) -> WeatherSample {
        WeatherSample {
            temperature,
            description: "Overcast".to_string(),
            weather_code: 3,
            humidity: 80.0,
            wind_speed: 12.0,
            fetched_at: Utc::now(),
        }
    }

    fn view() -> ResolvedView {
        ResolvedView {
            origin_name: "Munich".to_string(),
            origin: Coordinate::new(48.137, 11.576).unwrap(),
            origin_weather: sample(12.0),
            nearby: vec![NearbyWeather {
                place: NearbyPlace {
                    name: "Dachau".to_string(),
                    coordinate: Coordinate::new(48.26, 11.434).unwrap(),
                    distance_km: 17.4,
                },
                weather: sample(3.0),
            }],
        }
    }

    #[test]
    fn test_render_then_clear() {
        let mut session = MapSession::new(SnapshotSurface::default(), OverlayConfig::default());
        session.render(&view());

        assert_eq!(session.markers().len(), 2);
        assert_eq!(session.markers()[1].color, "#dc3545");
        assert_eq!(session.overlay().map(|o| o.points.len()), Some(2));
        assert_eq!(session.surface().snapshot().nearby.len(), 1);

        session.clear();
        let snapshot = session.surface().snapshot();
        assert!(session.markers().is_empty());
        assert!(session.overlay().is_none());
        assert!(snapshot.markers.is_empty());
        assert!(snapshot.overlay.is_none());
        assert!(snapshot.nearby.is_empty());
    }

    #[test]
    fn test_begin_advances_generation() {
        let mut session = MapSession::new(SnapshotSurface::default(), OverlayConfig::default());
        let first = session.begin();
        session.render(&view());
        let second = session.begin();

        assert!(second > first);
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
        assert!(session.markers().is_empty());
    }
}
