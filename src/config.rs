//! Configuration management for the `Meteostorico` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::MeteoError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Meteostorico` application
///
/// Every section defaults, so a clean machine with no config file and no
/// environment overrides loads successfully.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeteoConfig {
    /// Geocoding API configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather archive API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// JSON export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Geocoding API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding API key (required by OpenCage, sent as the `key` parameter)
    pub api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Language hint passed to the geocoder
    #[serde(default = "default_geocoding_language")]
    pub language: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather archive API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the historical weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Timezone parameter sent with every weather request
    #[serde(default = "default_weather_timezone")]
    pub timezone: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// JSON export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory where `weather-<year>.json` files are written
    #[serde(default = "default_export_directory")]
    pub directory: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://api.opencagedata.com/geocode/v1/json".to_string()
}

fn default_geocoding_language() -> String {
    "it".to_string()
}

fn default_weather_base_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_weather_timezone() -> String {
    "Europe/Rome".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_export_directory() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_geocoding_base_url(),
            language: default_geocoding_language(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timezone: default_weather_timezone(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl MeteoConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
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

        // Add environment variable overrides with METEOSTORICO_ prefix.
        // Double-underscore nesting keeps multi-word keys addressable,
        // e.g. METEOSTORICO_GEOCODING__API_KEY -> geocoding.api_key.
        builder = builder.add_source(
            Environment::with_prefix("METEOSTORICO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: MeteoConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("meteostorico").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.language.is_empty() {
            self.geocoding.language = default_geocoding_language();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_weather_timezone();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.export.directory.is_empty() {
            self.export.directory = default_export_directory();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.geocoding.api_key {
            if api_key.is_empty() {
                return Err(MeteoError::config(
                    "Geocoding API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(MeteoError::config(
                    "Geocoding API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 100 {
                return Err(MeteoError::config(
                    "Geocoding API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoding.timeout_seconds > 300 {
            return Err(
                MeteoError::config("Geocoding API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.timeout_seconds > 300 {
            return Err(MeteoError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(MeteoError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(MeteoError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.weather.timezone.contains(char::is_whitespace) {
            return Err(MeteoError::config(
                "Weather timezone must be an IANA identifier such as Europe/Rome",
            )
            .into());
        }

        Ok(())
    }

    /// Create configuration directory if it doesn't exist
    pub fn ensure_config_dir() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("meteostorico");
            std::fs::create_dir_all(&app_config_dir).with_context(|| {
                format!(
                    "Failed to create config directory: {}",
                    app_config_dir.display()
                )
            })?;
            Ok(app_config_dir)
        } else {
            Err(MeteoError::config("Unable to determine config directory").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MeteoConfig::default();
        assert_eq!(
            config.geocoding.base_url,
            "https://api.opencagedata.com/geocode/v1/json"
        );
        assert_eq!(config.geocoding.language, "it");
        assert_eq!(config.geocoding.timeout_seconds, 30);
        assert_eq!(
            config.weather.base_url,
            "https://archive-api.open-meteo.com/v1/archive"
        );
        assert_eq!(config.weather.timezone, "Europe/Rome");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.export.directory, ".");
        assert_eq!(config.logging.level, "info");
        assert!(config.geocoding.api_key.is_none());
    }

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        // A clean machine: no config file, every section comes up with its
        // serde defaults instead of a missing-field error
        let config =
            MeteoConfig::load_from_path(Some(PathBuf::from("/nonexistent/meteostorico.toml")))
                .expect("loading with no config file must succeed");

        assert_eq!(
            config.geocoding.base_url,
            "https://api.opencagedata.com/geocode/v1/json"
        );
        assert_eq!(config.weather.timezone, "Europe/Rome");
        assert_eq!(config.export.directory, ".");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_variable_override() {
        std::env::set_var("METEOSTORICO_GEOCODING__API_KEY", "test_key_from_env");

        let result =
            MeteoConfig::load_from_path(Some(PathBuf::from("/nonexistent/meteostorico.toml")));

        std::env::remove_var("METEOSTORICO_GEOCODING__API_KEY");

        let config = result.expect("loading with an env override must succeed");
        assert_eq!(
            config.geocoding.api_key,
            Some("test_key_from_env".to_string())
        );
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = MeteoConfig::default();
        // Key is optional at validation time; the geocoder simply omits it
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = MeteoConfig::default();
        config.geocoding.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = MeteoConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = MeteoConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("timeout cannot exceed"));

        let mut config = MeteoConfig::default();
        config.geocoding.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Geocoding API timeout"));
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = MeteoConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = MeteoConfig::default();
        config.weather.base_url = String::new();
        config.logging.level = String::new();
        config.apply_defaults();
        assert_eq!(
            config.weather.base_url,
            "https://archive-api.open-meteo.com/v1/archive"
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        let path = MeteoConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("meteostorico"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
