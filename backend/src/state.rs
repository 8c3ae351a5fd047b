//! Application state shared across handlers

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::ml::{RegressionPipeline, Regressor};
use crate::services::prediction::OptionalModel;
use crate::services::weather::WeatherAverages;

/// Read-only artifacts loaded once at startup
#[derive(Clone)]
pub struct AppState {
    pub yield_model: Arc<dyn Regressor>,
    pub revenue_model: OptionalModel,
    pub weather: Arc<WeatherAverages>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Load every artifact named by the configuration.
    ///
    /// The yield model is required and its absence is an error; the revenue
    /// model and the weather averages degrade to unavailable.
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let yield_path = config.artifacts.yield_model_path();
        let yield_model = RegressionPipeline::load(&yield_path)
            .with_context(|| format!("failed to load yield model from {}", yield_path.display()))?;
        tracing::info!(
            "Loaded yield model from {} (trained {})",
            yield_path.display(),
            yield_model.trained_at()
        );

        let revenue_model = load_optional_model(&config.artifacts.revenue_model_path());
        let weather = WeatherAverages::load(config.artifacts.avg_weather_path());

        Ok(Self {
            yield_model: Arc::new(yield_model),
            revenue_model,
            weather: Arc::new(weather),
            config: Arc::new(config),
        })
    }
}

fn load_optional_model(path: &Path) -> OptionalModel {
    if !path.exists() {
        tracing::warn!("Revenue model not found at {}; revenue will be 0.0", path.display());
        return OptionalModel::unavailable();
    }
    match RegressionPipeline::load(path) {
        Ok(model) => {
            tracing::info!("Loaded revenue model from {}", path.display());
            OptionalModel::new(Arc::new(model))
        }
        Err(err) => {
            tracing::warn!("Failed to load revenue model from {}: {}", path.display(), err);
            OptionalModel::unavailable()
        }
    }
}
