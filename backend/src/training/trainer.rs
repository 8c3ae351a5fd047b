//! Fitting, evaluating and persisting the yield and revenue models

use std::path::Path;

use shared::FeatureRow;

use super::dataset::{self, TrainingSample, TRAINING_COLUMNS, WEATHER_COLUMNS};
use super::TrainingError;
use crate::config::TrainingConfig;
use crate::ml::{EvaluationReport, Feature, RegressionPipeline, Regressor};

/// Target name stored in the yield artifact
pub const YIELD_TARGET: &str = "Yield (Kg/Ha)";
/// Target name stored in the revenue artifact
pub const REVENUE_TARGET: &str = "Estimated_Revenue (Rs/Ha)";

/// The two fitted pipelines, each carrying its held-out evaluation
pub struct TrainedModels {
    pub yield_model: RegressionPipeline,
    pub revenue_model: RegressionPipeline,
}

/// What a training run did
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub rows_loaded: usize,
    pub rows_cleaned: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub yield_report: EvaluationReport,
    pub revenue_report: EvaluationReport,
}

fn feature_set(config: &TrainingConfig) -> Vec<Feature> {
    let mut features = Feature::CATEGORICAL.to_vec();
    if config.include_weather_features {
        features.extend(Feature::WEATHER);
    }
    features
}

/// Split the samples, fit both models on the training part and score them on
/// the held-out part
pub fn train_models(samples: &[TrainingSample], config: &TrainingConfig) -> Result<TrainedModels, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let (train, test) = dataset::train_test_split(samples, config.test_size, config.seed);
    tracing::info!("Training on {} rows, evaluating on {}", train.len(), test.len());

    let features = feature_set(config);
    let params = config.forest_params();
    let train_rows: Vec<FeatureRow> = train.iter().map(|sample| sample.row.clone()).collect();
    let test_rows: Vec<FeatureRow> = test.iter().map(|sample| sample.row.clone()).collect();

    tracing::info!("Training the yield model...");
    let yield_targets: Vec<f64> = train.iter().map(|sample| sample.yield_kg_per_ha).collect();
    let mut yield_model = RegressionPipeline::fit(YIELD_TARGET, &features, &train_rows, &yield_targets, &params)?;

    tracing::info!("Training the revenue model...");
    let revenue_targets: Vec<f64> = train.iter().map(|sample| sample.revenue_rs_per_ha).collect();
    let mut revenue_model =
        RegressionPipeline::fit(REVENUE_TARGET, &features, &train_rows, &revenue_targets, &params)?;

    let yield_truth: Vec<f64> = test.iter().map(|sample| sample.yield_kg_per_ha).collect();
    let yield_report = EvaluationReport::score(&yield_truth, &yield_model.predict_many(&test_rows)?);
    log_report("Yield", "Kg/Ha", &yield_report);
    yield_model.set_evaluation(yield_report);

    let revenue_truth: Vec<f64> = test.iter().map(|sample| sample.revenue_rs_per_ha).collect();
    let revenue_report = EvaluationReport::score(&revenue_truth, &revenue_model.predict_many(&test_rows)?);
    log_report("Revenue", "Rs/Ha", &revenue_report);
    revenue_model.set_evaluation(revenue_report);

    Ok(TrainedModels {
        yield_model,
        revenue_model,
    })
}

fn log_report(name: &str, unit: &str, report: &EvaluationReport) {
    match (report.mae, report.r2) {
        (Some(mae), Some(r2)) => tracing::info!(
            "{} model: MAE {:.2} {}, R² {:.2} over {} held-out rows",
            name,
            mae,
            unit,
            r2,
            report.samples
        ),
        _ => tracing::warn!(
            "{} model: metrics unavailable ({} held-out rows)",
            name,
            report.samples
        ),
    }
}

/// Log predictions for the configured probes
pub fn log_probes(models: &TrainedModels, config: &TrainingConfig) {
    for probe in &config.probes {
        let row = FeatureRow::new(&probe.state, &probe.season, &probe.crop);
        match (models.yield_model.predict(&row), models.revenue_model.predict(&row)) {
            (Ok(predicted_yield), Ok(predicted_revenue)) => tracing::info!(
                "Prediction for '{}' in '{}' during '{}': yield {:.2} Kg/Ha, revenue Rs. {:.2}/Ha",
                probe.crop,
                probe.state,
                probe.season,
                predicted_yield,
                predicted_revenue
            ),
            (Err(err), _) | (_, Err(err)) => tracing::warn!(
                "Could not predict for '{}' in '{}' during '{}': {}",
                probe.crop,
                probe.state,
                probe.season,
                err
            ),
        }
    }
}

/// Run the full training job: load, clean, fit, evaluate and save both models
pub fn run(
    source: &Path,
    yield_out: &Path,
    revenue_out: &Path,
    config: &TrainingConfig,
) -> Result<TrainingSummary, TrainingError> {
    let mut required = TRAINING_COLUMNS.to_vec();
    if config.include_weather_features {
        required.extend(WEATHER_COLUMNS);
    }

    let records = dataset::load_records(source, &required)?;
    let samples = dataset::clean_records(&records, config.include_weather_features);
    let models = train_models(&samples, config)?;
    log_probes(&models, config);

    models.yield_model.save(yield_out)?;
    tracing::info!("Saved yield model to {}", yield_out.display());
    models.revenue_model.save(revenue_out)?;
    tracing::info!("Saved revenue model to {}", revenue_out.display());

    let summary_report = |model: &RegressionPipeline| {
        model.evaluation().cloned().unwrap_or(EvaluationReport {
            samples: 0,
            mae: None,
            r2: None,
        })
    };
    let yield_report = summary_report(&models.yield_model);
    let revenue_report = summary_report(&models.revenue_model);
    let test_rows = yield_report.samples;

    Ok(TrainingSummary {
        rows_loaded: records.len(),
        rows_cleaned: samples.len(),
        train_rows: samples.len() - test_rows,
        test_rows,
        yield_report,
        revenue_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_trees: 10,
            ..Default::default()
        }
    }

    fn synthetic_samples() -> Vec<TrainingSample> {
        let mut samples = Vec::new();
        for i in 0..20 {
            let jitter = f64::from(i % 5);
            samples.push(TrainingSample {
                row: FeatureRow::new("Punjab", "Kharif", "Rice"),
                yield_kg_per_ha: 4000.0 + jitter,
                revenue_rs_per_ha: 80_000.0 + jitter,
            });
            samples.push(TrainingSample {
                row: FeatureRow::new("Uttar Pradesh", "Rabi", "Wheat"),
                yield_kg_per_ha: 3000.0 + jitter,
                revenue_rs_per_ha: 60_000.0 + jitter,
            });
        }
        samples
    }

    #[test]
    fn test_empty_dataset_aborts() {
        assert!(matches!(
            train_models(&[], &small_config()),
            Err(TrainingError::EmptyDataset)
        ));
    }

    #[test]
    fn test_models_learn_group_means() {
        let models = train_models(&synthetic_samples(), &small_config()).unwrap();

        let rice = models
            .yield_model
            .predict(&FeatureRow::new("Punjab", "Kharif", "Rice"))
            .unwrap();
        let wheat = models
            .yield_model
            .predict(&FeatureRow::new("Uttar Pradesh", "Rabi", "Wheat"))
            .unwrap();
        assert!(rice > 3900.0 && rice < 4100.0, "rice yield {}", rice);
        assert!(wheat > 2900.0 && wheat < 3100.0, "wheat yield {}", wheat);

        let revenue = models
            .revenue_model
            .predict(&FeatureRow::new("Punjab", "Kharif", "Rice"))
            .unwrap();
        assert!(revenue > 79_000.0 && revenue < 81_000.0, "revenue {}", revenue);
    }

    #[test]
    fn test_evaluation_is_stored() {
        let models = train_models(&synthetic_samples(), &small_config()).unwrap();
        let report = models.yield_model.evaluation().unwrap();
        assert_eq!(report.samples, 8);
        assert!(report.mae.unwrap() < 100.0);
        assert_eq!(models.revenue_model.target(), REVENUE_TARGET);
        assert_eq!(models.yield_model.features(), &Feature::CATEGORICAL[..]);
    }

    #[test]
    fn test_run_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("crops.csv");
        let mut file = std::fs::File::create(&source).unwrap();
        writeln!(file, "State,Season,Crop,Productivity (Kg/Ha),Pricing (Min - Max Rs/Qtl)").unwrap();
        for i in 0..10 {
            writeln!(file, "Punjab,Kharif,Rice,{},\"1,800 - 2,200\"", 4000 + i).unwrap();
            writeln!(file, "Kerala,Kharif,Coconut,{},bad", 9000 + i).unwrap();
        }
        drop(file);

        let yield_out = dir.path().join("yield_model.json");
        let revenue_out = dir.path().join("revenue_model.json");
        let summary = run(&source, &yield_out, &revenue_out, &small_config()).unwrap();

        assert_eq!(summary.rows_loaded, 20);
        assert_eq!(summary.rows_cleaned, 10);
        assert_eq!(summary.train_rows + summary.test_rows, 10);

        let loaded = RegressionPipeline::load(&revenue_out).unwrap();
        let revenue = loaded.predict(&FeatureRow::new("Punjab", "Kharif", "Rice")).unwrap();
        assert!(revenue > 79_000.0 && revenue < 82_000.0, "revenue {}", revenue);
        assert!(yield_out.exists());
    }

    #[test]
    fn test_run_reports_missing_weather_columns() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("crops.csv");
        std::fs::write(&source, "State,Season,Crop,Yield (Kg/Ha),Price_Range (Rs/Qtl)\n").unwrap();

        let config = TrainingConfig {
            include_weather_features: true,
            ..small_config()
        };
        let err = run(&source, &dir.path().join("y.json"), &dir.path().join("r.json"), &config)
            .err()
            .unwrap();
        assert!(matches!(err, TrainingError::MissingColumns(ref missing) if missing.len() == 4));
    }
}
