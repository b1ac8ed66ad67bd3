//! `WeatherMap` - interactive weather map
//!
//! This library resolves a searched or clicked location, fetches current
//! weather for it and for nearby towns, and renders color-coded markers and
//! a heat overlay through pluggable map collaborators.

pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod input;
pub mod map;
pub mod models;
pub mod pipeline;
pub mod places;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::WeatherMapConfig;
pub use error::WeatherMapError;
pub use map::{CardPanel, MapSession, MapSurface};
pub use models::{Coordinate, NearbyPlace, PlaceCandidate, ResolvedView, WeatherSample};
pub use pipeline::{Pipeline, Resolution, Trigger};
pub use places::{NominatimClient, PlaceProvider};
pub use weather::{OpenMeteoClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
