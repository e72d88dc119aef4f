//! Historical weather fetcher backed by the Open-Meteo archive API
//!
//! Requests daily max/min temperature and precipitation sum for a coordinate
//! pair and date range, and carries the provider's parallel arrays over into
//! a [`WeatherSeries`].

use crate::config::MeteoConfig;
use crate::models::{Coordinates, WeatherSeries};
use crate::{MeteoError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// HTTP client for the historical weather API
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    timezone: String,
}

impl WeatherClient {
    /// Create a new weather client from configuration
    pub fn new(config: &MeteoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("meteostorico/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.weather.base_url.clone(),
            timezone: config.weather.timezone.clone(),
        })
    }

    /// Fetch the daily weather series for a coordinate pair and date range.
    ///
    /// The caller guarantees `start <= end`; the range is not re-validated
    /// here. Fails with [`MeteoError::NoData`] when the response lacks a
    /// non-empty daily max-temperature sequence.
    #[instrument(skip(self), fields(coords = %coords.format_coordinates()))]
    pub async fn fetch_historical(
        &self,
        coords: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherSeries> {
        let url = format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_max,temperature_2m_min,precipitation_sum&timezone={}",
            self.base_url,
            coords.lat,
            coords.lng,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            urlencoding::encode(&self.timezone)
        );

        debug!("Weather archive request URL: {}", url);

        let response: ArchiveResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let series = series_from_response(response)?;
        info!(
            "Fetched {} days of weather for ({})",
            series.len(),
            coords.format_coordinates()
        );
        Ok(series)
    }
}

/// Archive response from the Open-Meteo historical weather API
#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveResponse {
    pub(crate) daily: Option<DailyData>,
}

/// Daily weather arrays as returned by the provider
#[derive(Debug, Deserialize)]
pub(crate) struct DailyData {
    #[serde(default)]
    pub(crate) time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub(crate) temperature_max: Option<Vec<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub(crate) temperature_min: Option<Vec<f64>>,
    #[serde(rename = "precipitation_sum")]
    pub(crate) precipitation: Option<Vec<f64>>,
}

/// Carry the provider arrays over in order, rejecting empty responses
pub(crate) fn series_from_response(response: ArchiveResponse) -> Result<WeatherSeries> {
    let Some(daily) = response.daily else {
        warn!("Weather response carried no daily block");
        return Err(MeteoError::NoData);
    };

    let temp_max = daily.temperature_max.unwrap_or_default();
    if temp_max.is_empty() {
        warn!("Weather response carried an empty max-temperature sequence");
        return Err(MeteoError::NoData);
    }

    Ok(WeatherSeries {
        date: daily.time,
        temp_max,
        temp_min: daily.temperature_min.unwrap_or_default(),
        precipitation: daily.precipitation.unwrap_or_default(),
    })
}
