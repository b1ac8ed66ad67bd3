//! Weather sample model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at one coordinate, as normalized from the provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSample {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Raw WMO weather code reported by the provider
    pub weather_code: i32,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// When this sample was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSample {
    /// Temperature rounded to whole degrees
    #[must_use]
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature.round() as i64
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.rounded_temperature())
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} km/h", self.wind_speed)
    }

    #[must_use]
    pub fn temperature_class(&self) -> TemperatureClass {
        TemperatureClass::from_celsius(self.temperature)
    }
}

/// Three-way color coding of a temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureClass {
    /// At or below 5 °C
    Cold,
    /// Above 5 °C, at or below 30 °C
    Moderate,
    /// Above 30 °C
    Hot,
}

impl TemperatureClass {
    const COLD_MAX: f64 = 5.0;
    const MODERATE_MAX: f64 = 30.0;

    #[must_use]
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature <= Self::COLD_MAX {
            Self::Cold
        } else if temperature <= Self::MODERATE_MAX {
            Self::Moderate
        } else {
            Self::Hot
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Moderate => "moderate",
            Self::Hot => "hot",
        }
    }

    /// CSS class applied to weather cards
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Cold => "temperature-cold",
            Self::Moderate => "temperature-moderate",
            Self::Hot => "temperature-hot",
        }
    }

    /// Fill color for map markers
    #[must_use]
    pub fn marker_color(self) -> &'static str {
        match self {
            Self::Cold => "#dc3545",
            Self::Moderate => "#28a745",
            Self::Hot => "#ffc107",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-12.0, TemperatureClass::Cold)]
    #[case(5.0, TemperatureClass::Cold)]
    #[case(5.01, TemperatureClass::Moderate)]
    #[case(30.0, TemperatureClass::Moderate)]
    #[case(30.1, TemperatureClass::Hot)]
    #[case(44.0, TemperatureClass::Hot)]
    fn test_temperature_partition(#[case] temperature: f64, #[case] expected: TemperatureClass) {
        assert_eq!(TemperatureClass::from_celsius(temperature), expected);
    }

    #[test]
    fn test_class_presentation() {
        assert_eq!(TemperatureClass::Cold.css_class(), "temperature-cold");
        assert_eq!(TemperatureClass::Hot.marker_color(), "#ffc107");
        assert_eq!(TemperatureClass::Moderate.as_str(), "moderate");
    }

    #[test]
    fn test_formatting() {
        let sample = WeatherSample {
            temperature: 17.6,
            description: "Overcast".to_string(),
            weather_code: 3,
            humidity: 71.0,
            wind_speed: 9.4,
            fetched_at: Utc::now(),
        };
        assert_eq!(sample.format_temperature(), "18°C");
        assert_eq!(sample.format_humidity(), "71%");
        assert_eq!(sample.format_wind(), "9.4 km/h");
        assert_eq!(sample.temperature_class(), TemperatureClass::Moderate);
    }
}
