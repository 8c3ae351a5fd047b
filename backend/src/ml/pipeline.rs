//! Regression pipeline: one-hot encoding followed by a random forest

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{columns, FeatureRow};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::encoder::OneHotEncoder;
use super::{EvaluationReport, ModelError, Regressor};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Model input column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Feature {
    State,
    Season,
    Crop,
    Year,
    AvgTempC,
    RainfallMm,
    HumidityPct,
}

impl Feature {
    pub const CATEGORICAL: [Feature; 3] = [Feature::State, Feature::Season, Feature::Crop];
    pub const WEATHER: [Feature; 4] = [
        Feature::Year,
        Feature::AvgTempC,
        Feature::RainfallMm,
        Feature::HumidityPct,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Feature::State => columns::STATE,
            Feature::Season => columns::SEASON,
            Feature::Crop => columns::CROP,
            Feature::Year => columns::YEAR,
            Feature::AvgTempC => columns::AVG_TEMP_C,
            Feature::RainfallMm => columns::RAINFALL_MM,
            Feature::HumidityPct => columns::HUMIDITY_PCT,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Feature::State | Feature::Season | Feature::Crop)
    }

    fn categorical<'a>(&self, row: &'a FeatureRow) -> Option<&'a str> {
        match self {
            Feature::State => Some(&row.state),
            Feature::Season => Some(&row.season),
            Feature::Crop => Some(&row.crop),
            _ => None,
        }
    }

    fn numeric(&self, row: &FeatureRow) -> Option<f64> {
        let weather = row.weather.as_ref()?;
        match self {
            Feature::Year => Some(f64::from(weather.year)),
            Feature::AvgTempC => weather.avg_temp_c,
            Feature::RainfallMm => weather.rainfall_mm,
            Feature::HumidityPct => weather.humidity_pct,
            _ => None,
        }
    }
}

/// Random forest settings used when fitting a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn to_smartcore(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

/// A fitted regression pipeline, persisted as a JSON artifact
#[derive(Serialize, Deserialize)]
pub struct RegressionPipeline {
    target: String,
    features: Vec<Feature>,
    encoder: OneHotEncoder,
    forest: Forest,
    trained_at: DateTime<Utc>,
    #[serde(default)]
    evaluation: Option<EvaluationReport>,
}

impl RegressionPipeline {
    /// Fit the encoder and forest on `rows`, predicting `targets`
    pub fn fit(
        target: impl Into<String>,
        features: &[Feature],
        rows: &[FeatureRow],
        targets: &[f64],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != targets.len() {
            return Err(ModelError::LengthMismatch {
                rows: rows.len(),
                targets: targets.len(),
            });
        }

        let categorical: Vec<Feature> = features.iter().copied().filter(Feature::is_categorical).collect();
        let encoder = OneHotEncoder::fit(
            categorical.len(),
            rows.iter().map(|row| {
                categorical
                    .iter()
                    .filter_map(|feature| feature.categorical(row))
                    .collect::<Vec<_>>()
            }),
        );

        let x = design_matrix(features, &encoder, rows)?;
        let y = targets.to_vec();
        let forest = Forest::fit(&x, &y, params.to_smartcore())?;

        Ok(Self {
            target: target.into(),
            features: features.to_vec(),
            encoder,
            forest,
            trained_at: Utc::now(),
            evaluation: None,
        })
    }

    /// Load a pipeline artifact written by `save`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let bytes = fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let json = serde_json::to_vec(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn evaluation(&self) -> Option<&EvaluationReport> {
        self.evaluation.as_ref()
    }

    pub fn set_evaluation(&mut self, report: EvaluationReport) {
        self.evaluation = Some(report);
    }

    /// Predict every row in one forest pass
    pub fn predict_many(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = design_matrix(&self.features, &self.encoder, rows)?;
        let predictions = self.forest.predict(&x)?;
        match predictions.iter().find(|value| !value.is_finite()) {
            Some(value) => Err(ModelError::NonFinite(*value)),
            None => Ok(predictions),
        }
    }

    /// Encoded feature vector for one row
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        encode_row(&self.features, &self.encoder, row)
    }
}

/// Categorical columns are one-hot encoded first, followed by numeric
/// columns in feature order.
fn encode_row(
    features: &[Feature],
    encoder: &OneHotEncoder,
    row: &FeatureRow,
) -> Result<Vec<f64>, ModelError> {
    let mut encoded = Vec::with_capacity(encoder.width() + features.len());

    let categorical: Vec<&str> = features
        .iter()
        .filter_map(|feature| feature.categorical(row))
        .collect();
    encoder.encode_into(&categorical, &mut encoded);

    for feature in features.iter().filter(|feature| !feature.is_categorical()) {
        let value = feature
            .numeric(row)
            .ok_or(ModelError::MissingFeature(feature.column()))?;
        encoded.push(value);
    }

    Ok(encoded)
}

fn design_matrix(
    features: &[Feature],
    encoder: &OneHotEncoder,
    rows: &[FeatureRow],
) -> Result<DenseMatrix<f64>, ModelError> {
    let encoded = rows
        .iter()
        .map(|row| encode_row(features, encoder, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DenseMatrix::from_2d_vec(&encoded))
}

impl Regressor for RegressionPipeline {
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let predictions = self.predict_many(std::slice::from_ref(row))?;
        predictions.first().copied().ok_or(ModelError::EmptyPrediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::WeatherSummary;

    fn sample_rows() -> (Vec<FeatureRow>, Vec<f64>) {
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for _ in 0..8 {
            rows.push(FeatureRow::new("Punjab", "Rabi", "Wheat"));
            targets.push(4000.0);
            rows.push(FeatureRow::new("Bihar", "Kharif", "Rice"));
            targets.push(2000.0);
        }
        (rows, targets)
    }

    fn small_forest() -> ForestParams {
        ForestParams {
            n_trees: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_and_mismatched_input() {
        let params = small_forest();
        assert!(matches!(
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &[], &[], &params),
            Err(ModelError::EmptyTrainingSet)
        ));

        let rows = vec![FeatureRow::new("Punjab", "Rabi", "Wheat")];
        assert!(matches!(
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &rows, &[1.0, 2.0], &params),
            Err(ModelError::LengthMismatch { rows: 1, targets: 2 })
        ));
    }

    #[test]
    fn test_predictions_separate_distinct_groups() {
        let (rows, targets) = sample_rows();
        let pipeline =
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &rows, &targets, &small_forest()).unwrap();

        let wheat = pipeline.predict(&FeatureRow::new("Punjab", "Rabi", "Wheat")).unwrap();
        let rice = pipeline.predict(&FeatureRow::new("Bihar", "Kharif", "Rice")).unwrap();
        assert!(wheat > rice);
        assert!(wheat <= 4000.0 && rice >= 2000.0);
    }

    #[test]
    fn test_unseen_categories_still_predict() {
        let (rows, targets) = sample_rows();
        let pipeline =
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &rows, &targets, &small_forest()).unwrap();

        let prediction = pipeline.predict(&FeatureRow::new("Kerala", "Zaid", "Coconut"));
        assert!(prediction.unwrap().is_finite());
    }

    #[test]
    fn test_extra_weather_is_ignored_by_categorical_model() {
        let (rows, targets) = sample_rows();
        let pipeline =
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &rows, &targets, &small_forest()).unwrap();

        let plain = FeatureRow::new("Punjab", "Rabi", "Wheat");
        let with_weather = plain.clone().with_weather(WeatherSummary {
            year: 2024,
            avg_temp_c: Some(18.0),
            rainfall_mm: Some(120.0),
            humidity_pct: Some(55.0),
        });
        assert_eq!(pipeline.transform(&plain).unwrap(), pipeline.transform(&with_weather).unwrap());
    }

    #[test]
    fn test_weather_model_requires_weather() {
        let weather = WeatherSummary {
            year: 2024,
            avg_temp_c: Some(18.0),
            rainfall_mm: Some(120.0),
            humidity_pct: Some(55.0),
        };
        let (rows, targets) = sample_rows();
        let rows: Vec<FeatureRow> = rows.into_iter().map(|row| row.with_weather(weather)).collect();
        let features: Vec<Feature> = Feature::CATEGORICAL.iter().chain(Feature::WEATHER.iter()).copied().collect();
        let pipeline = RegressionPipeline::fit("Yield", &features, &rows, &targets, &small_forest()).unwrap();

        let encoded = pipeline.transform(&rows[0]).unwrap();
        assert_eq!(encoded.len(), 6 + 4);
        assert_eq!(encoded[6], 2024.0);

        let err = pipeline.predict(&FeatureRow::new("Punjab", "Rabi", "Wheat")).unwrap_err();
        assert!(matches!(err, ModelError::MissingFeature("Year")));
    }

    #[test]
    fn test_save_and_load_preserve_predictions() {
        let (rows, targets) = sample_rows();
        let pipeline =
            RegressionPipeline::fit("Yield", &Feature::CATEGORICAL, &rows, &targets, &small_forest()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yield_model.json");
        pipeline.save(&path).unwrap();
        let loaded = RegressionPipeline::load(&path).unwrap();

        let row = FeatureRow::new("Punjab", "Rabi", "Wheat");
        assert_eq!(loaded.target(), "Yield");
        assert_eq!(loaded.predict(&row).unwrap(), pipeline.predict(&row).unwrap());
    }
}
