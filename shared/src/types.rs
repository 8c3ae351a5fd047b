//! Common types used across the platform

use serde::{Deserialize, Serialize};

use crate::models::WeatherSummary;

/// Column names of the historical crop spreadsheet
pub mod columns {
    pub const STATE: &str = "State";
    pub const SEASON: &str = "Season";
    pub const CROP: &str = "Crop";
    pub const YEAR: &str = "Year";
    pub const AVG_TEMP_C: &str = "Avg_Temp_C";
    pub const RAINFALL_MM: &str = "Rainfall_mm";
    pub const HUMIDITY_PCT: &str = "Humidity_%";
    pub const YIELD: &str = "Yield (Kg/Ha)";
    pub const PRICE_RANGE: &str = "Price_Range (Rs/Qtl)";

    /// Legacy header for the yield column
    pub const LEGACY_YIELD: &str = "Productivity (Kg/Ha)";
    /// Legacy header for the price column
    pub const LEGACY_PRICE_RANGE: &str = "Pricing (Min - Max Rs/Qtl)";
}

/// A single row of model input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRow {
    pub state: String,
    pub season: String,
    pub crop: String,
    /// Weather context; absent for plain yield/revenue predictions
    pub weather: Option<WeatherSummary>,
}

impl FeatureRow {
    pub fn new(state: impl Into<String>, season: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            season: season.into(),
            crop: crop.into(),
            weather: None,
        }
    }

    pub fn with_weather(mut self, weather: WeatherSummary) -> Self {
        self.weather = Some(weather);
        self
    }
}
