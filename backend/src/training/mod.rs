//! Offline jobs: model training and weather-average precomputation

pub mod aggregate;
pub mod dataset;
pub mod trainer;

use std::path::PathBuf;

use thiserror::Error;

use crate::ml::ModelError;

pub use aggregate::{generate_weather_averages, AggregateSummary};
pub use dataset::{load_records, read_records, train_test_split, TrainingSample};
pub use trainer::{train_models, TrainedModels, TrainingSummary};

/// Errors that abort an offline job
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("source file not found at {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("missing columns in source: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no usable rows left after cleaning")]
    EmptyDataset,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
