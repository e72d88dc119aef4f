//! Form controller: field state, validation and the submit state machine
//!
//! Owns the address/date fields, runs the pure field validators, sequences
//! the geocode-then-fetch chain, and tracks the busy flag and the date-range
//! error message. Also hosts the previous-year JSON export action, which
//! bypasses the submit state machine entirely.

use crate::export;
use crate::geocoding::GeocodingClient;
use crate::models::{Address, WeatherSeries};
use crate::weather::WeatherClient;
use crate::{MeteoError, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Date format used by the two date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message stored when the start date falls after the end date
pub const DATE_RANGE_ERROR: &str = "The start date cannot be after the end date.";

/// Form field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Street,
    Zip,
    City,
    Province,
    Country,
    StartDate,
    EndDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Street => "street",
            Field::Zip => "zip",
            Field::City => "city",
            Field::Province => "province",
            Field::Country => "country",
            Field::StartDate => "start date",
            Field::EndDate => "end date",
        };
        f.write_str(label)
    }
}

/// Field-level validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field is empty
    Required,
    /// The field does not match its expected format
    Pattern,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("is required"),
            FieldError::Pattern => f.write_str("has an invalid format"),
        }
    }
}

/// Raw form field values, exactly as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub street: String,
    pub zip: String,
    pub city: String,
    pub province: String,
    pub country: String,
    /// Start of the requested range, `YYYY-MM-DD`
    pub start_date: String,
    /// End of the requested range, `YYYY-MM-DD`
    pub end_date: String,
}

impl FormFields {
    /// The address portion of the form
    #[must_use]
    pub fn address(&self) -> Address {
        Address::new(
            &self.street,
            &self.zip,
            &self.city,
            &self.province,
            &self.country,
        )
    }

    /// The free-text query string handed to the geocoder
    #[must_use]
    pub fn full_address(&self) -> String {
        self.address().full_address()
    }
}

/// Run the field-level validators.
///
/// Every field is required; the zip must be exactly 5 ASCII digits; the two
/// date fields must parse as `YYYY-MM-DD`. Returns an empty map for a valid
/// form.
#[must_use]
pub fn validate(fields: &FormFields) -> BTreeMap<Field, FieldError> {
    let mut errors = BTreeMap::new();

    let required = [
        (Field::Street, &fields.street),
        (Field::Zip, &fields.zip),
        (Field::City, &fields.city),
        (Field::Province, &fields.province),
        (Field::Country, &fields.country),
        (Field::StartDate, &fields.start_date),
        (Field::EndDate, &fields.end_date),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            errors.insert(field, FieldError::Required);
        }
    }

    if !errors.contains_key(&Field::Zip) && !is_valid_zip(&fields.zip) {
        errors.insert(Field::Zip, FieldError::Pattern);
    }

    for (field, value) in [
        (Field::StartDate, &fields.start_date),
        (Field::EndDate, &fields.end_date),
    ] {
        if !errors.contains_key(&field) && parse_date(value).is_none() {
            errors.insert(field, FieldError::Pattern);
        }
    }

    errors
}

fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// A validated request, ready for the geocode-then-fetch chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub full_address: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result of the local validation phase of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// One or more fields failed validation; nothing was fetched
    Invalid,
    /// The start date falls after the end date; nothing was fetched
    BadDateRange,
    /// Validation passed, the busy flag is set and the request may be run
    Ready(SubmitRequest),
}

/// Overall outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field validation failed; fields were marked touched
    Rejected,
    /// The date range was inverted; the date error message is set
    DateRangeError,
    /// The chain ran and a weather series is now stored
    Fetched,
}

/// Form state and the submit/reset/export actions
#[derive(Debug, Default)]
pub struct FormController {
    /// Current field values
    pub fields: FormFields,
    touched: bool,
    weather_data: Option<WeatherSeries>,
    date_error: Option<String>,
    loading: bool,
}

impl FormController {
    /// Create an empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form pre-filled with the given field values
    #[must_use]
    pub fn with_fields(fields: FormFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// The stored weather series, if the last submission succeeded
    #[must_use]
    pub fn weather_data(&self) -> Option<&WeatherSeries> {
        self.weather_data.as_ref()
    }

    /// The current date-range error message, if any
    #[must_use]
    pub fn date_error(&self) -> Option<&str> {
        self.date_error.as_deref()
    }

    /// Whether a fetch chain is currently in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a rejected submission has marked the fields touched
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Run the local validation phase of a submission.
    ///
    /// On field errors the fields are marked touched and nothing else
    /// changes. On an inverted date range the error message is set, any
    /// stored weather data is cleared and the busy flag stays down. Otherwise
    /// the busy flag goes up and the validated request is returned.
    pub fn prepare_submit(&mut self) -> PrepareOutcome {
        let errors = validate(&self.fields);
        if !errors.is_empty() {
            debug!("Submission rejected: {} invalid fields", errors.len());
            self.touched = true;
            return PrepareOutcome::Invalid;
        }

        self.loading = true;

        let (Some(start), Some(end)) = (
            parse_date(&self.fields.start_date),
            parse_date(&self.fields.end_date),
        ) else {
            // validate() already checked both dates parse
            self.touched = true;
            self.loading = false;
            return PrepareOutcome::Invalid;
        };

        if start > end {
            warn!("Rejected inverted date range {} > {}", start, end);
            self.date_error = Some(DATE_RANGE_ERROR.to_string());
            self.loading = false;
            self.weather_data = None;
            return PrepareOutcome::BadDateRange;
        }

        self.date_error = None;
        PrepareOutcome::Ready(SubmitRequest {
            full_address: self.fields.full_address(),
            start,
            end,
        })
    }

    /// Finish a submission with the result of the fetch chain.
    ///
    /// The busy flag is cleared whether the chain succeeded or failed. On
    /// success the series is stored; on failure prior data is left untouched
    /// and the error is handed back to the caller.
    pub fn complete_submit(&mut self, result: Result<WeatherSeries>) -> Result<()> {
        self.loading = false;
        let series = result?;
        info!("Stored weather series with {} days", series.len());
        self.weather_data = Some(series);
        Ok(())
    }

    /// Validate the form and run the geocode-then-fetch chain.
    ///
    /// The weather call starts only after geocoding succeeds; no requests
    /// overlap within one submission. Nothing guards against a second
    /// concurrent `submit` on the same form: the last response to arrive
    /// wins.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        geocoding: &GeocodingClient,
        weather: &WeatherClient,
    ) -> Result<SubmitOutcome> {
        let request = match self.prepare_submit() {
            PrepareOutcome::Invalid => return Ok(SubmitOutcome::Rejected),
            PrepareOutcome::BadDateRange => return Ok(SubmitOutcome::DateRangeError),
            PrepareOutcome::Ready(request) => request,
        };

        let result = run_chain(geocoding, weather, &request).await;
        self.complete_submit(result)?;
        Ok(SubmitOutcome::Fetched)
    }

    /// Fetch the full previous calendar year for the current address and
    /// write it to `weather-<year>.json` in `export_dir`.
    ///
    /// Independent of the submit state machine: the raw fields are used
    /// without validation, the form's own date fields are ignored, and the
    /// busy flag and stored series are never touched.
    #[instrument(skip(self, geocoding, weather))]
    pub async fn download_weather_data(
        &self,
        geocoding: &GeocodingClient,
        weather: &WeatherClient,
        export_dir: &Path,
    ) -> Result<PathBuf> {
        let year = download_year(Local::now().date_naive());
        let (start, end) = year_range(year)?;

        let request = SubmitRequest {
            full_address: self.fields.full_address(),
            start,
            end,
        };

        let series = run_chain(geocoding, weather, &request).await?;
        export::write_series(export_dir, year, &series)
    }

    /// Clear all fields, the stored series and the busy flag
    pub fn reset_form(&mut self) {
        self.fields = FormFields::default();
        self.touched = false;
        self.weather_data = None;
        self.loading = false;
    }
}

/// The dependent two-step chain: resolve coordinates, then fetch weather
async fn run_chain(
    geocoding: &GeocodingClient,
    weather: &WeatherClient,
    request: &SubmitRequest,
) -> Result<WeatherSeries> {
    let coords = geocoding.resolve(&request.full_address).await?;
    weather
        .fetch_historical(coords, request.start, request.end)
        .await
}

/// The export year: the calendar year before `today`'s
#[must_use]
pub fn download_year(today: NaiveDate) -> i32 {
    today.year() - 1
}

/// Jan 1 through Dec 31 of the given year
pub fn year_range(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| MeteoError::validation(format!("Invalid export year: {year}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_fields() -> FormFields {
        FormFields {
            street: "Via Roma 1".to_string(),
            zip: "10121".to_string(),
            city: "Torino".to_string(),
            province: "TO".to_string(),
            country: "Italia".to_string(),
            start_date: "2023-01-01".to_string(),
            end_date: "2023-01-03".to_string(),
        }
    }

    fn sample_series() -> WeatherSeries {
        WeatherSeries {
            date: vec!["2023-01-01".to_string()],
            temp_max: vec![7.2],
            temp_min: vec![-1.0],
            precipitation: vec![0.0],
        }
    }

    #[test]
    fn test_empty_form_has_all_fields_required() {
        let errors = validate(&FormFields::default());
        assert_eq!(errors.len(), 7);
        assert!(errors.values().all(|e| *e == FieldError::Required));
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&valid_fields()).is_empty());
    }

    #[rstest]
    #[case("10121", true)]
    #[case("00100", true)]
    #[case("1234", false)]
    #[case("123456", false)]
    #[case("12a45", false)]
    #[case("12 45", false)]
    fn test_zip_pattern(#[case] zip: &str, #[case] valid: bool) {
        let mut fields = valid_fields();
        fields.zip = zip.to_string();
        let errors = validate(&fields);
        if valid {
            assert!(errors.is_empty());
        } else {
            assert_eq!(errors.get(&Field::Zip), Some(&FieldError::Pattern));
        }
    }

    #[rstest]
    #[case("2023-13-01")]
    #[case("01/02/2023")]
    #[case("not a date")]
    fn test_malformed_dates_fail_pattern(#[case] date: &str) {
        let mut fields = valid_fields();
        fields.start_date = date.to_string();
        let errors = validate(&fields);
        assert_eq!(errors.get(&Field::StartDate), Some(&FieldError::Pattern));
    }

    #[test]
    fn test_full_address_join() {
        assert_eq!(
            valid_fields().full_address(),
            "Via Roma 1, 10121 Torino, TO, Italia"
        );
    }

    #[test]
    fn test_prepare_submit_sets_busy_flag() {
        let mut form = FormController::with_fields(valid_fields());

        let outcome = form.prepare_submit();
        let PrepareOutcome::Ready(request) = outcome else {
            panic!("expected a ready request, got {outcome:?}");
        };

        assert!(form.is_loading());
        assert!(form.date_error().is_none());
        assert_eq!(request.full_address, "Via Roma 1, 10121 Torino, TO, Italia");
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
    }

    #[test]
    fn test_invalid_fields_reject_submission() {
        let mut form = FormController::new();

        assert_eq!(form.prepare_submit(), PrepareOutcome::Invalid);
        assert!(form.is_touched());
        assert!(!form.is_loading());
        assert!(form.date_error().is_none());
    }

    #[test]
    fn test_inverted_date_range_sets_error_and_clears_data() {
        let mut fields = valid_fields();
        fields.start_date = "2024-06-10".to_string();
        fields.end_date = "2024-06-01".to_string();

        let mut form = FormController::with_fields(fields);
        form.weather_data = Some(sample_series());

        assert_eq!(form.prepare_submit(), PrepareOutcome::BadDateRange);
        assert_eq!(form.date_error(), Some(DATE_RANGE_ERROR));
        assert!(form.weather_data().is_none());
        assert!(!form.is_loading());
    }

    #[test]
    fn test_equal_dates_are_accepted() {
        let mut fields = valid_fields();
        fields.end_date = fields.start_date.clone();

        let mut form = FormController::with_fields(fields);
        assert!(matches!(form.prepare_submit(), PrepareOutcome::Ready(_)));
    }

    #[test]
    fn test_successful_completion_stores_series() {
        let mut form = FormController::with_fields(valid_fields());
        assert!(matches!(form.prepare_submit(), PrepareOutcome::Ready(_)));

        form.complete_submit(Ok(sample_series())).unwrap();

        assert!(!form.is_loading());
        assert_eq!(form.weather_data(), Some(&sample_series()));
    }

    #[test]
    fn test_failed_completion_clears_busy_flag_and_keeps_prior_data() {
        let mut form = FormController::with_fields(valid_fields());
        form.weather_data = Some(sample_series());
        assert!(matches!(form.prepare_submit(), PrepareOutcome::Ready(_)));

        let result = form.complete_submit(Err(MeteoError::NoData));

        assert!(matches!(result, Err(MeteoError::NoData)));
        assert!(!form.is_loading());
        // Prior data is left untouched on failure
        assert_eq!(form.weather_data(), Some(&sample_series()));
    }

    #[test]
    fn test_reset_form_clears_everything() {
        let mut form = FormController::with_fields(valid_fields());
        form.weather_data = Some(sample_series());
        form.loading = true;
        form.touched = true;

        form.reset_form();

        assert_eq!(form.fields, FormFields::default());
        assert!(form.weather_data().is_none());
        assert!(!form.is_loading());
        assert!(!form.is_touched());
    }

    #[test]
    fn test_download_always_targets_the_previous_year() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let year = download_year(today);
        assert_eq!(year, 2025);

        let (start, end) = year_range(year).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_download_year_ignores_day_within_year() {
        let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dec_last = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(download_year(jan_first), 2023);
        assert_eq!(download_year(dec_last), 2023);
    }
}
