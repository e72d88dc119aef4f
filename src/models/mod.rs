//! Data models for the `Meteostorico` application
//!
//! This module contains the core domain models organized by concern:
//! - Address: postal address fields and the geocoding query string
//! - Location: resolved geographic coordinates
//! - Weather: parallel daily weather series

pub mod address;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use address::Address;
pub use location::Coordinates;
pub use weather::WeatherSeries;
