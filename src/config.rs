//! Configuration management for the weather map
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherMapError;
use crate::models::Coordinate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the weather map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherMapConfig {
    /// Upstream HTTP provider settings
    pub providers: ProvidersConfig,
    /// Search, debounce and nearby-search settings
    pub search: SearchConfig,
    /// Map viewport and overlay settings
    pub map: MapConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP service settings
    pub web: WebConfig,
}

/// Upstream provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Base URL for the Open-Meteo compatible weather API
    pub weather_base_url: String,
    /// Base URL for the Nominatim compatible geocoding API
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    pub max_retries: u32,
    /// User agent sent with every request (Nominatim rejects anonymous clients)
    pub user_agent: String,
}

/// Search configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of suggestions per text query
    pub suggestion_limit: u32,
    /// Minimum trimmed query length before a search is issued
    pub min_query_chars: u32,
    /// Idle time before a typed query is issued, in milliseconds
    pub debounce_ms: u64,
    /// Radius for the nearby-settlement search in kilometers
    pub nearby_radius_km: f64,
    /// Maximum number of nearby settlements requested
    pub nearby_limit: u32,
}

/// How streamed nearby cards are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NearbyOrder {
    /// Render each card as soon as its weather arrives
    #[default]
    Arrival,
    /// Buffer cards and flush them nearest-first once all fetches settle
    Distance,
}

/// Map configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial viewport center
    pub default_center: Coordinate,
    /// Initial zoom level
    pub default_zoom: u8,
    /// Zoom level used when centering on a resolved location
    pub search_zoom: u8,
    /// Presentation order of nearby cards
    pub nearby_order: NearbyOrder,
    /// Heat overlay options
    pub overlay: OverlayConfig,
}

/// Heat overlay configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Temperature mapped to full intensity, in Celsius
    pub max_temperature: f64,
    /// Point radius in pixels
    pub radius: u32,
    /// Blur radius in pixels
    pub blur: u32,
    /// Zoom level at which points reach full intensity
    pub max_zoom: u8,
    /// Gradient stops as (intensity, color)
    pub gradient: Vec<(f64, String)>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// HTTP service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Port the service listens on
    pub port: u16,
    /// Optional directory of static files served as fallback
    pub static_dir: Option<String>,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("weathermap/{}", crate::VERSION)
}

fn default_suggestion_limit() -> u32 {
    5
}

fn default_min_query_chars() -> u32 {
    3
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_nearby_radius() -> f64 {
    100.0
}

fn default_nearby_limit() -> u32 {
    20
}

fn default_center() -> Coordinate {
    Coordinate {
        latitude: 48.137_154,
        longitude: 11.576_124,
    }
}

fn default_zoom() -> u8 {
    8
}

fn default_search_zoom() -> u8 {
    9
}

fn default_max_temperature() -> f64 {
    40.0
}

fn default_gradient() -> Vec<(f64, String)> {
    vec![
        (0.0, "#dc3545".to_string()),
        (0.5, "#28a745".to_string()),
        (1.0, "#ffc107".to_string()),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            weather_base_url: default_weather_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
            min_query_chars: default_min_query_chars(),
            debounce_ms: default_debounce_ms(),
            nearby_radius_km: default_nearby_radius(),
            nearby_limit: default_nearby_limit(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
            search_zoom: default_search_zoom(),
            nearby_order: NearbyOrder::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_temperature: default_max_temperature(),
            radius: 50,
            blur: 30,
            max_zoom: 10,
            gradient: default_gradient(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: None,
        }
    }
}

impl WeatherMapConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WEATHERMAP_SEARCH__NEARBY_RADIUS_KM=50
        builder = builder.add_source(
            Environment::with_prefix("WEATHERMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| WeatherMapError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: WeatherMapConfig = settings.try_deserialize().map_err(|e| {
            WeatherMapError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathermap").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.weather_base_url.is_empty() {
            self.providers.weather_base_url = default_weather_base_url();
        }
        if self.providers.geocoding_base_url.is_empty() {
            self.providers.geocoding_base_url = default_geocoding_base_url();
        }
        if self.providers.timeout_seconds == 0 {
            self.providers.timeout_seconds = default_timeout();
        }
        if self.providers.user_agent.is_empty() {
            self.providers.user_agent = default_user_agent();
        }
        if self.search.suggestion_limit == 0 {
            self.search.suggestion_limit = default_suggestion_limit();
        }
        if self.search.min_query_chars == 0 {
            self.search.min_query_chars = default_min_query_chars();
        }
        if self.search.nearby_radius_km <= 0.0 {
            self.search.nearby_radius_km = default_nearby_radius();
        }
        if self.search.nearby_limit == 0 {
            self.search.nearby_limit = default_nearby_limit();
        }
        if self.map.overlay.max_temperature <= 0.0 {
            self.map.overlay.max_temperature = default_max_temperature();
        }
        if self.map.overlay.gradient.is_empty() {
            self.map.overlay.gradient = default_gradient();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), WeatherMapError> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<(), WeatherMapError> {
        for (name, value) in [
            ("Nearby radius", self.search.nearby_radius_km),
            ("Overlay max temperature", self.map.overlay.max_temperature),
        ] {
            if !value.is_finite() {
                return Err(WeatherMapError::config(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        if self.providers.timeout_seconds > 300 {
            return Err(WeatherMapError::config(
                "Provider timeout cannot exceed 300 seconds",
            ));
        }

        if self.providers.max_retries > 10 {
            return Err(WeatherMapError::config(
                "Provider max retries cannot exceed 10",
            ));
        }

        if self.search.suggestion_limit > 50 {
            return Err(WeatherMapError::config(
                "Suggestion limit cannot exceed 50",
            ));
        }

        if self.search.nearby_radius_km > 500.0 {
            return Err(WeatherMapError::config(
                "Nearby radius cannot exceed 500 km",
            ));
        }

        if self.search.nearby_limit > 50 {
            return Err(WeatherMapError::config(
                "Nearby limit cannot exceed 50",
            ));
        }

        if self.map.search_zoom > 19 || self.map.default_zoom > 19 {
            return Err(WeatherMapError::config("Zoom levels cannot exceed 19"));
        }

        Coordinate::new(
            self.map.default_center.latitude,
            self.map.default_center.longitude,
        )
        .map_err(|e| WeatherMapError::config(format!("Invalid default center: {e}")))?;

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<(), WeatherMapError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Weather", &self.providers.weather_base_url),
            ("Geocoding", &self.providers.geocoding_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherMapError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}
