//! Error types and handling for the `Meteostorico` application

use thiserror::Error;

/// Main error type for the `Meteostorico` application
#[derive(Error, Debug)]
pub enum MeteoError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (field values, date ranges)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Geocoding returned zero results for the query
    #[error("No geocoding results found for '{query}'")]
    NotFound { query: String },

    /// The weather provider returned an empty or missing daily series
    #[error("No weather data available for the requested range")]
    NoData,

    /// Network or HTTP-layer failures of either external call
    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// JSON serialization errors on the export path
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MeteoError {
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

    /// Create a new not-found error for a geocoding query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            MeteoError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            MeteoError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            MeteoError::NotFound { query } => {
                format!("No results found for address '{query}'.")
            }
            MeteoError::NoData => {
                "No weather data available for the requested location and dates.".to_string()
            }
            MeteoError::Transport { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            MeteoError::Json { .. } => "Failed to serialize weather data.".to_string(),
            MeteoError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
