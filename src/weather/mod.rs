//! Current-weather retrieval
//!
//! The [`WeatherProvider`] trait is the seam the pipeline fetches through;
//! [`open_meteo::OpenMeteoClient`] is the HTTP implementation.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Coordinate, WeatherSample};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of current conditions for a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch and normalize current conditions.
    ///
    /// Fails with `Network` on transport or status failure and with
    /// `MalformedResponse` when expected fields are absent.
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherSample>;
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
