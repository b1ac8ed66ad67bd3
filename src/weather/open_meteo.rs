use chrono::Utc;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::instrument;

use super::{WeatherProvider, weather_code_to_description};
use crate::config::ProvidersConfig;
use crate::models::{Coordinate, WeatherSample};
use crate::{Result, WeatherMapError, http};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";

/// Open-Meteo current-conditions client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::with_client(
            http::api_client(config)?,
            config.weather_base_url.clone(),
        ))
    }

    pub fn with_client(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn forecast_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={}",
            self.base_url, coordinate.latitude, coordinate.longitude, CURRENT_FIELDS
        )
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(level = "debug", skip(self))]
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherSample> {
        let response: ForecastResponse =
            http::get_json(&self.client, &self.forecast_url(coordinate)).await?;
        response.into_sample()
    }
}

/// Forecast response, restricted to the `current` block we request
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    humidity: Option<f64>,
    #[serde(rename = "wind_speed_10m")]
    wind_speed: Option<f64>,
    weather_code: Option<i32>,
}

impl ForecastResponse {
    fn into_sample(self) -> Result<WeatherSample> {
        let current = self
            .current
            .ok_or_else(|| WeatherMapError::malformed("response has no 'current' object"))?;

        let temperature = current.temperature.ok_or_else(|| missing("temperature_2m"))?;
        let humidity = current.humidity.ok_or_else(|| missing("relative_humidity_2m"))?;
        let wind_speed = current.wind_speed.ok_or_else(|| missing("wind_speed_10m"))?;
        let weather_code = current.weather_code.ok_or_else(|| missing("weather_code"))?;

        Ok(WeatherSample {
            temperature,
            description: weather_code_to_description(weather_code).to_string(),
            weather_code,
            humidity,
            wind_speed,
            fetched_at: Utc::now(),
        })
    }
}

fn missing(field: &str) -> WeatherMapError {
    WeatherMapError::malformed(format!("current.{field} is missing"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<WeatherSample> {
        serde_json::from_str::<ForecastResponse>(body)?.into_sample()
    }

    #[test]
    fn test_parse_current_block() {
        let sample = parse(
            r#"{"latitude":48.14,"longitude":11.58,"current":{"time":"2026-10-19T12:00","interval":900,
                "temperature_2m":14.2,"relative_humidity_2m":63,"wind_speed_10m":11.9,"weather_code":2}}"#,
        )
        .unwrap();
        assert_eq!(sample.temperature, 14.2);
        assert_eq!(sample.humidity, 63.0);
        assert_eq!(sample.wind_speed, 11.9);
        assert_eq!(sample.description, "Partly cloudy");
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        let sample = parse(
            r#"{"current":{"temperature_2m":1.0,"relative_humidity_2m":90,"wind_speed_10m":3.0,"weather_code":12}}"#,
        )
        .unwrap();
        assert_eq!(sample.description, "Unknown");
        assert_eq!(sample.weather_code, 12);
    }

    #[test]
    fn test_missing_current_is_malformed() {
        let err = parse(r#"{"latitude":48.14,"longitude":11.58}"#).unwrap_err();
        assert!(matches!(err, WeatherMapError::MalformedResponse { .. }));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = parse(r#"{"current":{"temperature_2m":1.0,"weather_code":0}}"#).unwrap_err();
        assert!(err.to_string().contains("relative_humidity_2m"));
    }

    #[test]
    fn test_forecast_url() {
        let client = OpenMeteoClient::new(&ProvidersConfig::default()).unwrap();
        let url = client.forecast_url(Coordinate::new(48.1, 11.5).unwrap());
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/forecast?latitude=48.1&longitude=11.5&current=temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code"
        );
    }
}
