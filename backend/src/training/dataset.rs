//! Loading and cleaning the historical crop spreadsheet

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::{
    columns, estimated_revenue, parse_average_price, CropRecord, FeatureRow, WeatherSummary,
};

use super::TrainingError;

/// Columns every training run needs
pub const TRAINING_COLUMNS: [&str; 5] = [
    columns::STATE,
    columns::SEASON,
    columns::CROP,
    columns::YIELD,
    columns::PRICE_RANGE,
];

/// Columns additionally needed when weather features are enabled
pub const WEATHER_COLUMNS: [&str; 4] = [
    columns::YEAR,
    columns::AVG_TEMP_C,
    columns::RAINFALL_MM,
    columns::HUMIDITY_PCT,
];

/// One cleaned row with both regression targets
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub row: FeatureRow,
    pub yield_kg_per_ha: f64,
    pub revenue_rs_per_ha: f64,
}

/// Map legacy spreadsheet headers onto their canonical names
fn canonical_header(header: &str) -> &str {
    match header.trim() {
        columns::LEGACY_YIELD => columns::YIELD,
        columns::LEGACY_PRICE_RANGE => columns::PRICE_RANGE,
        other => other,
    }
}

/// Load crop records from a CSV export, checking that `required` columns exist
pub fn load_records(path: impl AsRef<Path>, required: &[&str]) -> Result<Vec<CropRecord>, TrainingError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TrainingError::SourceNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let records = read_records(file, required)?;
    tracing::info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse crop records from CSV with a header row.
///
/// Blank cells and numbers that do not parse are read as missing. Every
/// missing required column is reported at once.
pub fn read_records<R: Read>(reader: R, required: &[&str]) -> Result<Vec<CropRecord>, TrainingError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| (canonical_header(header), index))
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !positions.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TrainingError::MissingColumns(missing));
    }

    let column = |name: &str| positions.get(name).copied();
    let state_col = column(columns::STATE);
    let season_col = column(columns::SEASON);
    let crop_col = column(columns::CROP);
    let year_col = column(columns::YEAR);
    let temp_col = column(columns::AVG_TEMP_C);
    let rain_col = column(columns::RAINFALL_MM);
    let humidity_col = column(columns::HUMIDITY_PCT);
    let yield_col = column(columns::YIELD);
    let price_col = column(columns::PRICE_RANGE);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let text = |col: Option<usize>| {
            col.and_then(|col| record.get(col))
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
        };
        let number = |col: Option<usize>| {
            col.and_then(|col| record.get(col))
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
        };

        records.push(CropRecord {
            state: text(state_col),
            season: text(season_col),
            crop: text(crop_col),
            year: number(year_col),
            avg_temp_c: number(temp_col),
            rainfall_mm: number(rain_col),
            humidity_pct: number(humidity_col),
            yield_kg_per_ha: number(yield_col),
            price_range: text(price_col),
        });
    }

    Ok(records)
}

/// Turn a record into a training sample, or `None` if any needed field is missing
pub fn training_sample(record: &CropRecord, with_weather: bool) -> Option<TrainingSample> {
    let (state, season, crop) = record.categories()?;
    let yield_kg_per_ha = record.yield_kg_per_ha?;
    let average_price = parse_average_price(record.price_range.as_deref()?).ok()?;
    let revenue_rs_per_ha = estimated_revenue(yield_kg_per_ha, average_price);
    if !revenue_rs_per_ha.is_finite() {
        return None;
    }

    let mut row = FeatureRow::new(state, season, crop);
    if with_weather {
        row = row.with_weather(WeatherSummary {
            year: record.year?.round_ties_even() as i32,
            avg_temp_c: Some(record.avg_temp_c?),
            rainfall_mm: Some(record.rainfall_mm?),
            humidity_pct: Some(record.humidity_pct?),
        });
    }

    Some(TrainingSample {
        row,
        yield_kg_per_ha,
        revenue_rs_per_ha,
    })
}

/// Clean every record, dropping the ones that cannot be used
pub fn clean_records(records: &[CropRecord], with_weather: bool) -> Vec<TrainingSample> {
    let samples: Vec<TrainingSample> = records
        .iter()
        .filter_map(|record| training_sample(record, with_weather))
        .collect();
    tracing::info!(
        "Cleaned dataset: kept {} of {} rows",
        samples.len(),
        records.len()
    );
    samples
}

/// Shuffle with a fixed seed and hold out `test_size` of the items.
///
/// The held-out count is rounded up, but at least one item is always left
/// for training.
pub fn train_test_split<T: Clone>(items: &[T], test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let requested = (items.len() as f64 * test_size.clamp(0.0, 1.0)).ceil() as usize;
    let n_test = requested.min(items.len().saturating_sub(1));

    let (test_indices, train_indices) = indices.split_at(n_test);
    let pick = |indices: &[usize]| indices.iter().map(|&i| items[i].clone()).collect::<Vec<_>>();
    (pick(train_indices), pick(test_indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LEGACY_CSV: &str = "\
State,Season,Crop,Year,Avg_Temp_C,Rainfall_mm,Humidity_%,Productivity (Kg/Ha),Pricing (Min - Max Rs/Qtl)
Punjab,Kharif,Rice,2021,31.5,650,72,4000,\"1,800 - 2,200\"
Punjab,Rabi,Wheat,2021,18.2,120,55,,2000-2400
Kerala,Kharif,Rice,2022,28.0,2100,85,2900,not a price
Bihar,Rabi,Wheat,,19.0,90,60,3100,1900-2100
";

    #[test]
    fn test_legacy_headers_are_renamed() {
        let records = read_records(LEGACY_CSV.as_bytes(), &TRAINING_COLUMNS).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].yield_kg_per_ha, Some(4000.0));
        assert_eq!(records[0].price_range.as_deref(), Some("1,800 - 2,200"));
    }

    #[test]
    fn test_blank_cells_are_missing() {
        let records = read_records(LEGACY_CSV.as_bytes(), &TRAINING_COLUMNS).unwrap();
        assert_eq!(records[1].yield_kg_per_ha, None);
        assert_eq!(records[3].year, None);
    }

    #[test]
    fn test_all_missing_columns_are_reported() {
        let csv = "State,Crop\nPunjab,Rice\n";
        match read_records(csv.as_bytes(), &TRAINING_COLUMNS) {
            Err(TrainingError::MissingColumns(missing)) => assert_eq!(
                missing,
                vec![
                    columns::SEASON.to_string(),
                    columns::YIELD.to_string(),
                    columns::PRICE_RANGE.to_string(),
                ]
            ),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            load_records(&path, &TRAINING_COLUMNS),
            Err(TrainingError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_cleaning_drops_unusable_rows() {
        let records = read_records(LEGACY_CSV.as_bytes(), &TRAINING_COLUMNS).unwrap();
        let samples = clean_records(&records, false);

        // Missing yield and an unparseable price are dropped
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].row, FeatureRow::new("Punjab", "Kharif", "Rice"));
        assert_eq!(samples[0].revenue_rs_per_ha, 40.0 * 2000.0);
        assert_eq!(samples[1].row.state, "Bihar");
    }

    #[test]
    fn test_weather_cleaning_requires_weather() {
        let records = read_records(LEGACY_CSV.as_bytes(), &TRAINING_COLUMNS).unwrap();
        let samples = clean_records(&records, true);

        // Bihar has no year
        assert_eq!(samples.len(), 1);
        let weather = samples[0].row.weather.unwrap();
        assert_eq!(weather.year, 2021);
        assert_eq!(weather.rainfall_mm, Some(650.0));
    }

    #[test]
    fn test_split_is_seeded() {
        let items: Vec<u32> = (0..50).collect();
        assert_eq!(train_test_split(&items, 0.2, 42), train_test_split(&items, 0.2, 42));

        let (train, test) = train_test_split(&items, 0.2, 42);
        assert_eq!(train.len(), 40);
        assert_eq!(test.len(), 10);
    }

    #[test]
    fn test_split_keeps_one_training_item() {
        let (train, test) = train_test_split(&[1, 2], 0.9, 7);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);

        let (train, test) = train_test_split(&[1], 0.2, 7);
        assert_eq!(train, vec![1]);
        assert!(test.is_empty());
    }

    proptest! {
        #[test]
        fn prop_split_partitions_items(len in 1usize..200, test_size in 0.0f64..1.0, seed: u64) {
            let items: Vec<usize> = (0..len).collect();
            let (train, test) = train_test_split(&items, test_size, seed);

            prop_assert!(!train.is_empty());
            prop_assert_eq!(train.len() + test.len(), len);

            let mut all: Vec<usize> = train.into_iter().chain(test).collect();
            all.sort_unstable();
            prop_assert_eq!(all, items);
        }
    }
}
