//! Declarative chart option for the daily temperature series
//!
//! [`build_chart_spec`] maps a [`WeatherSeries`] into an ECharts-style option
//! tree: a category x-axis of dates, a value y-axis in Celsius, and two line
//! series for max and min temperature. The spec is pure data; any charting
//! frontend can consume its serialized form.

use crate::models::WeatherSeries;
use serde::Serialize;

/// Full chart option, recomputed whenever the weather series changes
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    pub title: Title,
    pub tooltip: Tooltip,
    pub legend: Legend,
    #[serde(rename = "xAxis")]
    pub x_axis: CategoryAxis,
    #[serde(rename = "yAxis")]
    pub y_axis: ValueAxis,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tooltip {
    pub trigger: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    pub data: Vec<String>,
}

/// Category axis bound to the date labels
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryAxis {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<String>,
}

/// Numeric axis with a unit label
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueAxis {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// One named line series plotted against the shared date axis
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<f64>,
}

/// Build the chart option for a weather series.
///
/// Pure and infallible: an empty series yields a chart with axes and no data
/// points rather than an error.
#[must_use]
pub fn build_chart_spec(series: &WeatherSeries) -> ChartSpec {
    ChartSpec {
        title: Title {
            text: "Temperature giornaliere".to_string(),
        },
        tooltip: Tooltip {
            trigger: "axis".to_string(),
        },
        legend: Legend {
            data: vec!["Max".to_string(), "Min".to_string()],
        },
        x_axis: CategoryAxis {
            kind: "category".to_string(),
            data: series.date.clone(),
        },
        y_axis: ValueAxis {
            kind: "value".to_string(),
            name: "Temperatura (°C)".to_string(),
        },
        series: vec![
            LineSeries {
                name: "Max".to_string(),
                kind: "line".to_string(),
                data: series.temp_max.clone(),
            },
            LineSeries {
                name: "Min".to_string(),
                kind: "line".to_string(),
                data: series.temp_min.clone(),
            },
        ],
    }
}
