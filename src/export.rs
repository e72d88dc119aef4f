//! JSON file export for a full year of weather data

use crate::models::WeatherSeries;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used for a yearly export
#[must_use]
pub fn export_file_name(year: i32) -> String {
    format!("weather-{year}.json")
}

/// Write the series as pretty-printed JSON (2-space indent) into `dir`,
/// creating the directory if needed. Returns the path of the written file.
pub fn write_series(dir: &Path, year: i32, series: &WeatherSeries) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(series)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(year));
    fs::write(&path, json)?;

    info!("Exported weather data to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> WeatherSeries {
        WeatherSeries {
            date: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            temp_max: vec![5.1, 4.8],
            temp_min: vec![-0.7, -1.9],
            precipitation: vec![0.0, 3.4],
        }
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(2024), "weather-2024.json");
    }

    #[test]
    fn test_written_file_round_trips_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_series(dir.path(), 2024, &sample_series()).unwrap();

        assert_eq!(path.file_name().unwrap(), "weather-2024.json");

        let contents = fs::read_to_string(&path).unwrap();
        // Pretty-printed with 2-space indentation
        assert!(contents.contains("\n  \"date\""));
        assert!(contents.contains("\"tempMax\""));

        let parsed: WeatherSeries = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, sample_series());
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2023");
        let path = write_series(&nested, 2023, &sample_series()).unwrap();
        assert!(path.exists());
    }
}
