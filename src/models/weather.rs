//! Daily weather series model

use serde::{Deserialize, Serialize};

/// Parallel daily sequences returned by the weather provider.
///
/// All four vectors have the same length, one entry per day in the requested
/// range, dates ascending. Field names serialize with the camelCase keys used
/// by the JSON export (`date`, `tempMax`, `tempMin`, `precipitation`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WeatherSeries {
    /// Calendar dates in `YYYY-MM-DD` form
    pub date: Vec<String>,
    /// Daily maximum temperature in Celsius
    #[serde(rename = "tempMax")]
    pub temp_max: Vec<f64>,
    /// Daily minimum temperature in Celsius
    #[serde(rename = "tempMin")]
    pub temp_min: Vec<f64>,
    /// Daily precipitation sum in millimeters
    pub precipitation: Vec<f64>,
}

impl WeatherSeries {
    /// Number of days in the series
    #[must_use]
    pub fn len(&self) -> usize {
        self.date.len()
    }

    /// Whether the series holds no days at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }

    /// Whether all four sequences have the same length
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.date.len();
        self.temp_max.len() == len
            && self.temp_min.len() == len
            && self.precipitation.len() == len
    }
}
