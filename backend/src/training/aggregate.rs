//! Per-state, per-season weather averages for the recommendation flow

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use shared::{columns, CropRecord, WeatherAverage, REFERENCE_YEAR};

use super::dataset;
use super::TrainingError;

/// Columns a row needs to contribute to an average
pub const REQUIRED_COLUMNS: [&str; 8] = [
    columns::STATE,
    columns::SEASON,
    columns::CROP,
    columns::YEAR,
    columns::AVG_TEMP_C,
    columns::RAINFALL_MM,
    columns::HUMIDITY_PCT,
    columns::YIELD,
];

const HEADER: [&str; 6] = [
    columns::STATE,
    columns::SEASON,
    columns::YEAR,
    columns::AVG_TEMP_C,
    columns::RAINFALL_MM,
    columns::HUMIDITY_PCT,
];

/// Result of writing the weather-average file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub rows: usize,
    /// Hex SHA-256 of the written file
    pub sha256: String,
}

#[derive(Default)]
struct Totals {
    count: usize,
    year: f64,
    avg_temp_c: f64,
    rainfall_mm: f64,
    humidity_pct: f64,
}

type CompleteRow<'a> = (&'a str, &'a str, f64, f64, f64, f64);

fn complete_row(record: &CropRecord) -> Option<CompleteRow<'_>> {
    let (state, season, _crop) = record.categories()?;
    record.yield_kg_per_ha?;
    Some((
        state,
        season,
        record.year?,
        record.avg_temp_c?,
        record.rainfall_mm?,
        record.humidity_pct?,
    ))
}

/// Average year and weather for every (state, season) group, in sorted order.
///
/// Rows missing any of the required fields are skipped.
pub fn average_weather(records: &[CropRecord]) -> Vec<WeatherAverage> {
    let mut groups: BTreeMap<(String, String), Totals> = BTreeMap::new();

    for record in records {
        let Some((state, season, year, temp, rain, humidity)) = complete_row(record) else {
            continue;
        };

        let totals = groups
            .entry((state.to_string(), season.to_string()))
            .or_default();
        totals.count += 1;
        totals.year += year;
        totals.avg_temp_c += temp;
        totals.rainfall_mm += rain;
        totals.humidity_pct += humidity;
    }

    groups
        .into_iter()
        .map(|((state, season), totals)| {
            let n = totals.count as f64;
            let mean_year = totals.year / n;
            WeatherAverage {
                state,
                season,
                year: if mean_year.is_finite() {
                    mean_year.round_ties_even() as i32
                } else {
                    REFERENCE_YEAR
                },
                avg_temp_c: totals.avg_temp_c / n,
                rainfall_mm: totals.rainfall_mm / n,
                humidity_pct: totals.humidity_pct / n,
            }
        })
        .collect()
}

/// Write the averages as CSV with a fixed float format
pub fn write_averages<W: Write>(averages: &[WeatherAverage], writer: W) -> Result<(), TrainingError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for average in averages {
        csv_writer.write_record([
            average.state.clone(),
            average.season.clone(),
            average.year.to_string(),
            format!("{:.4}", average.avg_temp_c),
            format!("{:.4}", average.rainfall_mm),
            format!("{:.4}", average.humidity_pct),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Load the crop spreadsheet, average its weather and write the result to `out`
pub fn generate_weather_averages(source: &Path, out: &Path) -> Result<AggregateSummary, TrainingError> {
    let records = dataset::load_records(source, &REQUIRED_COLUMNS)?;
    let averages = average_weather(&records);

    let mut buffer = Vec::new();
    write_averages(&averages, &mut buffer)?;
    std::fs::write(out, &buffer)?;

    let summary = AggregateSummary {
        rows: averages.len(),
        sha256: format!("{:x}", Sha256::digest(&buffer)),
    };
    tracing::info!(
        "Wrote {} (rows: {}, sha256: {})",
        out.display(),
        summary.rows,
        summary.sha256
    );
    Ok(summary)
}
