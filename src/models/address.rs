//! Postal address model and the geocoding query string it produces

use serde::{Deserialize, Serialize};

/// A postal address as entered in the form
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// Street and house number
    pub street: String,
    /// Postal code (5 ASCII digits)
    pub zip: String,
    /// City or municipality
    pub city: String,
    /// Province or region
    pub province: String,
    /// Country name
    pub country: String,
}

impl Address {
    /// Create a new address
    #[must_use]
    pub fn new(street: &str, zip: &str, city: &str, province: &str, country: &str) -> Self {
        Self {
            street: street.to_string(),
            zip: zip.to_string(),
            city: city.to_string(),
            province: province.to_string(),
            country: country.to_string(),
        }
    }

    /// Combine the fields into the free-text query string sent to the geocoder
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{}, {} {}, {}, {}",
            self.street, self.zip, self.city, self.province, self.country
        )
    }
}
