//! Location-resolution and weather-aggregation pipeline
//!
//! Turns one user action into one rendered [`ResolvedView`]: resolve the
//! origin, render its weather, then fan out to nearby settlements and
//! stream their weather onto the map. Every invocation starts a new
//! [`Generation`] on the shared [`MapSession`]; a result is rendered only
//! while its generation is still current, so a newer search always wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{NearbyOrder, WeatherMapConfig};
use crate::map::{CardPanel, Generation, MapSession, MapSurface};
use crate::models::{Coordinate, NearbyWeather, PlaceCandidate, ResolvedView};
use crate::places::{NominatimClient, PlaceProvider};
use crate::weather::{OpenMeteoClient, WeatherProvider};
use crate::{Result, WeatherMapError};

/// The user action that starts an invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Free-text submission; the first search candidate becomes the origin
    TextSearch { query: String },
    /// A clicked suggestion, name and coordinate already known
    Suggestion(PlaceCandidate),
    /// A geocoder control result
    Geocoder(Coordinate),
    /// A click on the map
    MapClick(Coordinate),
}

/// Outcome of an invocation that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The view was fully rendered
    Rendered(ResolvedView),
    /// A newer invocation started before this one finished; nothing more was rendered
    Superseded,
}

/// Tunables the pipeline reads from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub suggestion_limit: u32,
    pub nearby_radius_km: f64,
    pub nearby_limit: u32,
    pub search_zoom: u8,
    pub nearby_order: NearbyOrder,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&WeatherMapConfig::default())
    }
}

impl From<&WeatherMapConfig> for PipelineSettings {
    fn from(config: &WeatherMapConfig) -> Self {
        Self {
            suggestion_limit: config.search.suggestion_limit,
            nearby_radius_km: config.search.nearby_radius_km,
            nearby_limit: config.search.nearby_limit,
            search_zoom: config.map.search_zoom,
            nearby_order: config.map.nearby_order,
        }
    }
}

pub struct Pipeline<S> {
    weather: Arc<dyn WeatherProvider>,
    places: Arc<dyn PlaceProvider>,
    session: Arc<Mutex<MapSession<S>>>,
    settings: PipelineSettings,
}

impl<S> Clone for Pipeline<S> {
    fn clone(&self) -> Self {
        Self {
            weather: Arc::clone(&self.weather),
            places: Arc::clone(&self.places),
            session: Arc::clone(&self.session),
            settings: self.settings.clone(),
        }
    }
}

impl<S: MapSurface + CardPanel> Pipeline<S> {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        places: Arc<dyn PlaceProvider>,
        session: MapSession<S>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            weather,
            places,
            session: Arc::new(Mutex::new(session)),
            settings,
        }
    }

    /// Wire the Open-Meteo and Nominatim clients to a surface
    pub fn from_config(config: &WeatherMapConfig, surface: S) -> Result<Self> {
        let weather = OpenMeteoClient::new(&config.providers)?;
        let places = NominatimClient::new(&config.providers)?;
        Ok(Self::new(
            Arc::new(weather),
            Arc::new(places),
            MapSession::new(surface, config.map.overlay.clone()),
            PipelineSettings::from(config),
        ))
    }

    /// Lock the map session
    pub fn session(&self) -> MutexGuard<'_, MapSession<S>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Suggestion candidates for a (debounced) text query
    pub async fn suggest(&self, query: &str) -> Vec<PlaceCandidate> {
        self.places
            .search_by_text(query, self.settings.suggestion_limit)
            .await
    }

    /// Run one invocation, superseding any invocation still in flight.
    ///
    /// Origin failures are shown on the card panel and returned; nearby
    /// failures only drop the affected place.
    #[instrument(skip(self))]
    pub async fn run(&self, trigger: Trigger) -> Result<Resolution> {
        let generation = self.session().begin();

        match self.resolve_and_render(generation, trigger).await {
            Err(e) => {
                warn!("Invocation {} failed: {}", generation.0, e);
                match self.with_current(generation, |session| session.show_error(&e.user_message())) {
                    Some(()) => Err(e),
                    None => Ok(Resolution::Superseded),
                }
            }
            Ok(resolution) => Ok(resolution),
        }
    }

    async fn resolve_and_render(
        &self,
        generation: Generation,
        trigger: Trigger,
    ) -> Result<Resolution> {
        let (origin_name, origin) = self.resolve_origin(trigger).await?;
        let zoom = self.settings.search_zoom;
        if self
            .with_current(generation, |session| session.center_on(origin, zoom))
            .is_none()
        {
            return Ok(Resolution::Superseded);
        }

        let origin_weather = self.weather.current_weather(origin).await?;
        if self
            .with_current(generation, |session| {
                session.show_origin(&origin_name, origin, &origin_weather);
            })
            .is_none()
        {
            return Ok(Resolution::Superseded);
        }

        let places = self
            .places
            .find_nearby(origin, self.settings.nearby_radius_km, self.settings.nearby_limit)
            .await;
        debug!("Fetching weather for {} nearby places", places.len());

        let mut settled: Vec<Option<NearbyWeather>> = (0..places.len()).map(|_| None).collect();
        let mut fetches: FuturesUnordered<_> = places
            .into_iter()
            .enumerate()
            .map(|(index, place)| {
                let weather = Arc::clone(&self.weather);
                async move {
                    let result = weather.current_weather(place.coordinate).await;
                    (index, place, result)
                }
            })
            .collect();

        let streaming = self.settings.nearby_order == NearbyOrder::Arrival;

        // Dropping `fetches` on supersession cancels the remaining requests
        while let Some((index, place, result)) = fetches.next().await {
            let current = self.with_current(generation, |session| {
                if let (true, Ok(weather)) = (streaming, &result) {
                    session.show_nearby(&place, weather);
                }
            });
            if current.is_none() {
                return Ok(Resolution::Superseded);
            }

            match result {
                Ok(weather) => settled[index] = Some(NearbyWeather { place, weather }),
                Err(e) => warn!("Skipping {}: {}", place.name, e),
            }
        }

        let view = ResolvedView {
            origin_name,
            origin,
            origin_weather,
            nearby: settled.into_iter().flatten().collect(),
        };

        let order = self.settings.nearby_order;
        let rendered = self.with_current(generation, |session| {
            if order == NearbyOrder::Distance {
                for entry in &view.nearby {
                    session.show_nearby(&entry.place, &entry.weather);
                }
            }
            session.set_overlay(&view);
        });

        match rendered {
            Some(()) => {
                info!(
                    "Rendered {} with {} nearby places",
                    view.origin_name,
                    view.nearby.len()
                );
                Ok(Resolution::Rendered(view))
            }
            None => Ok(Resolution::Superseded),
        }
    }

    async fn resolve_origin(&self, trigger: Trigger) -> Result<(String, Coordinate)> {
        match trigger {
            Trigger::TextSearch { query } => {
                let candidate = self
                    .places
                    .search_by_text(&query, 1)
                    .await
                    .into_iter()
                    .next()
                    .ok_or_else(|| WeatherMapError::no_results(format!("'{query}'")))?;
                Ok((candidate.display_name, candidate.coordinate))
            }
            Trigger::Suggestion(candidate) => {
                let coordinate = revalidate(candidate.coordinate)?;
                Ok((candidate.display_name, coordinate))
            }
            Trigger::Geocoder(coordinate) | Trigger::MapClick(coordinate) => {
                let coordinate = revalidate(coordinate)?;
                let name = self.places.reverse_lookup(coordinate).await?;
                Ok((name, coordinate))
            }
        }
    }

    /// Apply `render` only if `generation` is still the session's current one
    fn with_current<R>(
        &self,
        generation: Generation,
        render: impl FnOnce(&mut MapSession<S>) -> R,
    ) -> Option<R> {
        let mut session = self.session();
        if session.is_current(generation) {
            Some(render(&mut session))
        } else {
            debug!(
                "Dropping result of generation {} (current is {})",
                generation.0,
                session.generation().0
            );
            None
        }
    }
}

/// Coordinates arriving from outside may bypass `Coordinate::new`
fn revalidate(coordinate: Coordinate) -> Result<Coordinate> {
    Coordinate::new(coordinate.latitude, coordinate.longitude)
}
