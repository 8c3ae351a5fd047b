//! Weather average models

use serde::{Deserialize, Serialize};

/// Year substituted when a weather average carries no usable year
pub const REFERENCE_YEAR: i32 = 2025;

/// Mean weather figures for one (state, season) pair.
///
/// Field names follow the column names of the source spreadsheet so that the
/// JSON returned to the frontend lines up with the precomputed CSV.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Avg_Temp_C")]
    pub avg_temp_c: Option<f64>,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: Option<f64>,
    #[serde(rename = "Humidity_%")]
    pub humidity_pct: Option<f64>,
}

/// One row of the precomputed weather-average file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAverage {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Avg_Temp_C")]
    pub avg_temp_c: f64,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: f64,
    #[serde(rename = "Humidity_%")]
    pub humidity_pct: f64,
}

impl WeatherAverage {
    pub fn summary(&self) -> WeatherSummary {
        WeatherSummary {
            year: self.year,
            avg_temp_c: Some(self.avg_temp_c),
            rainfall_mm: Some(self.rainfall_mm),
            humidity_pct: Some(self.humidity_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_with_column_names() {
        let summary = WeatherSummary {
            year: 2023,
            avg_temp_c: Some(27.5),
            rainfall_mm: Some(812.0),
            humidity_pct: Some(64.25),
        };

        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["Year"], 2023);
        assert_eq!(value["Avg_Temp_C"], 27.5);
        assert_eq!(value["Rainfall_mm"], 812.0);
        assert_eq!(value["Humidity_%"], 64.25);
    }

    #[test]
    fn test_missing_figures_serialize_as_null() {
        let summary = WeatherSummary {
            year: REFERENCE_YEAR,
            avg_temp_c: None,
            rainfall_mm: Some(10.0),
            humidity_pct: None,
        };

        let value = serde_json::to_value(summary).unwrap();
        assert!(value["Avg_Temp_C"].is_null());
        assert_eq!(value["Year"], 2025);
    }
}
