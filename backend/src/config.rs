//! Configuration management for the AgriVerse platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRI__ prefix

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::ml::ForestParams;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model and weather artifact locations
    pub artifacts: ArtifactConfig,

    /// Offline training settings
    pub training: TrainingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactConfig {
    /// Directory that relative artifact paths resolve against
    pub dir: PathBuf,

    /// Serialized yield model (required by the server)
    pub yield_model: PathBuf,

    /// Serialized revenue model (optional)
    pub revenue_model: PathBuf,

    /// Precomputed per-state/per-season weather averages (optional)
    pub avg_weather: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    /// Fraction of cleaned rows held out for evaluation
    pub test_size: f64,

    /// Seed for the train/test split and the forests
    pub seed: u64,

    /// Trees per forest
    pub n_trees: usize,

    /// Maximum tree depth, unlimited when absent
    pub max_depth: Option<u16>,

    pub min_samples_leaf: usize,

    /// Feed the four weather columns to the models alongside the categoricals
    pub include_weather_features: bool,

    /// Inputs whose predictions are logged after training
    #[serde(default = "default_probes")]
    pub probes: Vec<SampleProbe>,
}

/// A (state, season, crop) triple used as a post-training sanity check
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SampleProbe {
    pub state: String,
    pub season: String,
    pub crop: String,
}

impl SampleProbe {
    pub fn new(state: &str, season: &str, crop: &str) -> Self {
        Self {
            state: state.to_string(),
            season: season.to_string(),
            crop: crop.to_string(),
        }
    }
}

fn default_probes() -> Vec<SampleProbe> {
    vec![
        SampleProbe::new("Punjab", "Kharif", "Rice"),
        SampleProbe::new("Uttar Pradesh", "Rabi", "Wheat"),
        SampleProbe::new("Maharashtra", "Kharif", "Cotton"),
    ]
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("AGRI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("artifacts.dir", ".")?
            .set_default("artifacts.yield_model", "yield_model.json")?
            .set_default("artifacts.revenue_model", "revenue_model.json")?
            .set_default("artifacts.avg_weather", "avg_weather.csv")?
            .set_default("training.test_size", 0.2)?
            .set_default("training.seed", 42)?
            .set_default("training.n_trees", 100)?
            .set_default("training.min_samples_leaf", 1)?
            .set_default("training.include_weather_features", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRI__ prefix)
            .add_source(
                Environment::with_prefix("AGRI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ArtifactConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    pub fn yield_model_path(&self) -> PathBuf {
        self.resolve(&self.yield_model)
    }

    pub fn revenue_model_path(&self) -> PathBuf {
        self.resolve(&self.revenue_model)
    }

    pub fn avg_weather_path(&self) -> PathBuf {
        self.resolve(&self.avg_weather)
    }
}

impl TrainingConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            artifacts: ArtifactConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            yield_model: PathBuf::from("yield_model.json"),
            revenue_model: PathBuf::from("revenue_model.json"),
            avg_weather: PathBuf::from("avg_weather.csv"),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            include_weather_features: false,
            probes: default_probes(),
        }
    }
}
