//! Tabular regression models for yield and revenue prediction

pub mod encoder;
pub mod pipeline;

use serde::{Deserialize, Serialize};
use shared::FeatureRow;
use thiserror::Error;

pub use encoder::OneHotEncoder;
pub use pipeline::{Feature, ForestParams, RegressionPipeline};

/// Errors raised while fitting, loading or invoking a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("feature '{0}' is required by the model but missing from the input")]
    MissingFeature(&'static str),

    #[error("cannot fit a model on an empty training set")]
    EmptyTrainingSet,

    #[error("{rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("model produced a non-finite prediction: {0}")]
    NonFinite(f64),

    #[error("model produced no prediction")]
    EmptyPrediction,

    #[error("random forest error: {0}")]
    Forest(#[from] smartcore::error::Failed),

    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Anything that turns a feature row into a numeric prediction
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError>;
}

/// Held-out evaluation of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationReport {
    pub samples: usize,
    /// Mean absolute error, in target units
    pub mae: Option<f64>,
    pub r2: Option<f64>,
}

impl EvaluationReport {
    /// Score predictions against the true targets.
    ///
    /// Metrics that cannot be computed (no samples, constant targets) are
    /// reported as `None`.
    pub fn score(y_true: &[f64], y_pred: &[f64]) -> Self {
        if y_true.is_empty() || y_true.len() != y_pred.len() {
            return Self {
                samples: 0,
                mae: None,
                r2: None,
            };
        }

        let y_true = y_true.to_vec();
        let y_pred = y_pred.to_vec();
        let finite = |value: f64| value.is_finite().then_some(value);

        Self {
            samples: y_true.len(),
            mae: finite(smartcore::metrics::mean_absolute_error(&y_true, &y_pred)),
            r2: finite(smartcore::metrics::r2(&y_true, &y_pred)),
        }
    }
}
