//! Data models for the weather map
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: validated latitude/longitude pairs
//! - Weather: current weather samples and temperature classification
//! - Place: search candidates and nearby settlements
//! - View: the aggregate produced by one pipeline invocation

pub mod coordinate;
pub mod place;
pub mod view;
pub mod weather;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use place::{NearbyPlace, PlaceCandidate};
pub use view::{NearbyWeather, ResolvedView};
pub use weather::{TemperatureClass, WeatherSample};
