//! Weather service for looking up precomputed weather averages

use std::io::Read;
use std::path::Path;

use shared::{columns, normalize_key, WeatherSummary, REFERENCE_YEAR};
use thiserror::Error;

/// Errors raised while loading the weather-average file
#[derive(Error, Debug)]
pub enum WeatherLoadError {
    #[error("weather file not found at {0}")]
    NotFound(String),

    #[error("Column {0} missing in weather file")]
    MissingColumn(&'static str),

    #[error("weather file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("weather file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
}

const REQUIRED_COLUMNS: [&str; 5] = [
    columns::STATE,
    columns::SEASON,
    columns::AVG_TEMP_C,
    columns::RAINFALL_MM,
    columns::HUMIDITY_PCT,
];

/// A weather-average row with its precomputed lookup key
#[derive(Debug, Clone, PartialEq)]
struct IndexedRow {
    state_key: String,
    season_key: String,
    summary: WeatherSummary,
}

/// Read-only table of weather averages keyed by (state, season)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    rows: Vec<IndexedRow>,
}

impl WeatherTable {
    /// Load the table from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WeatherLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WeatherLoadError::NotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse the table from CSV with a header row.
    ///
    /// `State`, `Season`, `Avg_Temp_C`, `Rainfall_mm` and `Humidity_%` are
    /// required; `Year` is optional. Numeric cells that do not parse become
    /// missing, and a missing year falls back to the reference year.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WeatherLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let position = |name: &str| headers.iter().position(|header| header.trim() == name);
        let mut required = [0usize; 5];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name).ok_or(WeatherLoadError::MissingColumn(name))?;
        }
        let [state_col, season_col, temp_col, rain_col, humidity_col] = required;
        let year_col = position(columns::YEAR);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let text = |col: usize| record.get(col).unwrap_or_default();
            let number = |col: usize| text(col).trim().parse::<f64>().ok().filter(|v| !v.is_nan());

            let year = year_col
                .and_then(number)
                .map(|year| year.round_ties_even() as i32)
                .unwrap_or(REFERENCE_YEAR);

            rows.push(IndexedRow {
                state_key: normalize_key(text(state_col)),
                season_key: normalize_key(text(season_col)),
                summary: WeatherSummary {
                    year,
                    avg_temp_c: number(temp_col),
                    rainfall_mm: number(rain_col),
                    humidity_pct: number(humidity_col),
                },
            });
        }

        Ok(Self { rows })
    }

    /// First row matching (state, season), ignoring case and surrounding whitespace
    pub fn lookup(&self, state: &str, season: &str) -> Option<&WeatherSummary> {
        let state_key = normalize_key(state);
        let season_key = normalize_key(season);
        self.rows
            .iter()
            .find(|row| row.state_key == state_key && row.season_key == season_key)
            .map(|row| &row.summary)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The weather-average subsystem, which may be unavailable at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherAverages {
    Loaded(WeatherTable),
    Unavailable { reason: String },
}

impl WeatherAverages {
    /// Load the weather averages, degrading to `Unavailable` on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match WeatherTable::load(path) {
            Ok(table) => {
                tracing::info!("Loaded {} weather-average rows from {}", table.len(), path.display());
                WeatherAverages::Loaded(table)
            }
            Err(err) => {
                tracing::warn!("Weather averages unavailable: {}", err);
                WeatherAverages::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, WeatherAverages::Loaded(_))
    }

    pub fn table(&self) -> Option<&WeatherTable> {
        match self {
            WeatherAverages::Loaded(table) => Some(table),
            WeatherAverages::Unavailable { .. } => None,
        }
    }
}
