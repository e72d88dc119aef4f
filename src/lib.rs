//! `Meteostorico` - historical daily weather lookup for street addresses
//!
//! This library resolves a free-text address to coordinates via a geocoding
//! API, fetches daily max/min temperature and precipitation for a date range
//! from the Open-Meteo archive, and maps the result into a declarative chart
//! option or a pretty-printed JSON export.

pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod geocoding;
pub mod models;
pub mod weather;

// Re-export core types for public API
pub use chart::{build_chart_spec, ChartSpec};
pub use config::MeteoConfig;
pub use error::MeteoError;
pub use form::{validate, Field, FieldError, FormController, FormFields, SubmitOutcome};
pub use geocoding::GeocodingClient;
pub use models::{Address, Coordinates, WeatherSeries};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, MeteoError>;
