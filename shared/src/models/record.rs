//! Historical crop records

use serde::{Deserialize, Serialize};

/// One row of the historical crop spreadsheet after column renaming.
///
/// Every cell is optional: the source is a hand-maintained spreadsheet and
/// each consumer decides which fields it needs before dropping the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CropRecord {
    pub state: Option<String>,
    pub season: Option<String>,
    pub crop: Option<String>,
    pub year: Option<f64>,
    pub avg_temp_c: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub humidity_pct: Option<f64>,
    /// Yield in kg per hectare
    pub yield_kg_per_ha: Option<f64>,
    /// Raw "min - max" price string in Rs per quintal
    pub price_range: Option<String>,
}

impl CropRecord {
    /// State, season and crop when all three are present
    pub fn categories(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.state.as_deref()?,
            self.season.as_deref()?,
            self.crop.as_deref()?,
        ))
    }
}
