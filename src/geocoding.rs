//! Coordinate resolver backed by the OpenCage geocoding API
//!
//! Converts a free-text address string into latitude/longitude coordinates.
//! One GET per resolution, first result wins.

use crate::config::MeteoConfig;
use crate::models::Coordinates;
use crate::{MeteoError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// HTTP client for the geocoding API
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
}

impl GeocodingClient {
    /// Create a new geocoding client from configuration
    pub fn new(config: &MeteoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.geocoding.timeout_seconds.into()))
            .user_agent(concat!("meteostorico/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.geocoding.base_url.clone(),
            api_key: config.geocoding.api_key.clone(),
            language: config.geocoding.language.clone(),
        })
    }

    /// Resolve a free-text address to coordinates.
    ///
    /// Takes the geometry of the first (best) result. Fails with
    /// [`MeteoError::NotFound`] when the provider returns zero results;
    /// transport and HTTP-status failures propagate unchanged.
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Coordinates> {
        debug!("Geocoding address: '{}'", address);

        let mut url = format!(
            "{}?q={}&language={}",
            self.base_url,
            urlencoding::encode(address),
            self.language
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(key);
        }

        let response: GeocodingResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let coords = first_geometry(response, address)?;
        info!(
            "Resolved '{}' to ({})",
            address,
            coords.format_coordinates()
        );
        Ok(coords)
    }
}

/// Geocoding response, shaped like the OpenCage `/geocode/v1/json` payload
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResponse {
    #[serde(default)]
    pub(crate) results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResult {
    pub(crate) geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

/// Extract the first result's geometry, unchanged
pub(crate) fn first_geometry(response: GeocodingResponse, query: &str) -> Result<Coordinates> {
    match response.results.into_iter().next() {
        Some(result) => Ok(Coordinates::new(result.geometry.lat, result.geometry.lng)),
        None => {
            warn!("No geocoding results for '{}'", query);
            Err(MeteoError::not_found(query))
        }
    }
}
