//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

use crate::{Result, WeatherMapError};

/// A point on the globe in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherMapError::validation(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherMapError::validation(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse the string pair returned by Nominatim-style providers
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = latitude.trim().parse::<f64>().map_err(|e| {
            WeatherMapError::malformed(format!("invalid latitude '{latitude}': {e}"))
        })?;
        let lon = longitude.trim().parse::<f64>().map_err(|e| {
            WeatherMapError::malformed(format!("invalid longitude '{longitude}': {e}"))
        })?;
        Self::new(lat, lon)
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for haversine::Location {
    fn from(value: Coordinate) -> Self {
        haversine::Location {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_in_range() {
        let munich = Coordinate::new(48.137_154, 11.576_124).unwrap();
        assert_eq!(munich.format_coordinates(), "48.1372, 11.5761");
    }

    #[test]
    fn test_coordinate_out_of_range() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_parse_provider_strings() {
        let c = Coordinate::parse("48.1371079", " 11.5753822").unwrap();
        assert!((c.latitude - 48.137_107_9).abs() < 1e-9);

        let err = Coordinate::parse("north", "11.5").unwrap_err();
        assert!(matches!(err, WeatherMapError::MalformedResponse { .. }));
    }
}
