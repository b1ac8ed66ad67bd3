//! Error types and handling for the weather map

use thiserror::Error;

/// Main error type for the weather map
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherMapError {
    /// Transport failure or non-success HTTP status
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response body was missing expected fields or could not be parsed
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// A lookup produced an empty candidate set
    #[error("No results: {message}")]
    NoResults { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl WeatherMapError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new no-results error
    pub fn no_results<S: Into<String>>(message: S) -> Self {
        Self::NoResults {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message, suitable for the card panel
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherMapError::Network { .. } => {
                "Could not load weather for this location. Please check your internet connection."
                    .to_string()
            }
            WeatherMapError::MalformedResponse { .. } => {
                "Could not load weather for this location. The provider returned unexpected data."
                    .to_string()
            }
            WeatherMapError::NoResults { message } => format!("No places found for {message}"),
            WeatherMapError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WeatherMapError::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}

impl From<reqwest_middleware::Error> for WeatherMapError {
    fn from(err: reqwest_middleware::Error) -> Self {
        WeatherMapError::network(err.to_string())
    }
}

impl From<reqwest::Error> for WeatherMapError {
    fn from(err: reqwest::Error) -> Self {
        WeatherMapError::network(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherMapError {
    fn from(err: serde_json::Error) -> Self {
        WeatherMapError::malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let network_err = WeatherMapError::network("connection refused");
        assert!(matches!(network_err, WeatherMapError::Network { .. }));

        let malformed_err = WeatherMapError::malformed("missing current");
        assert!(matches!(malformed_err, WeatherMapError::MalformedResponse { .. }));

        let empty_err = WeatherMapError::no_results("Atlantis");
        assert!(matches!(empty_err, WeatherMapError::NoResults { .. }));
    }

    #[test]
    fn test_user_messages() {
        let network_err = WeatherMapError::network("test");
        assert!(network_err.user_message().contains("Could not load weather"));

        let empty_err = WeatherMapError::no_results("'Atlantis'");
        assert!(empty_err.user_message().contains("Atlantis"));

        let validation_err = WeatherMapError::validation("latitude 91 out of range");
        assert!(validation_err.user_message().contains("latitude 91"));
    }

    #[test]
    fn test_json_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WeatherMapError = json_err.into();
        assert!(matches!(err, WeatherMapError::MalformedResponse { .. }));
    }
}
