//! Yield and revenue prediction service

use std::sync::Arc;

use shared::{round2, FeatureRow, PredictRequest, PredictResponse};

use crate::error::AppResult;
use crate::ml::Regressor;

/// A model that may be absent at runtime.
///
/// Callers ask `is_available` or use `predict_or_zero` instead of checking
/// for a missing model themselves.
#[derive(Clone, Default)]
pub struct OptionalModel {
    model: Option<Arc<dyn Regressor>>,
}

impl OptionalModel {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Prediction for `row`, or 0.0 when the model is absent or fails
    pub fn predict_or_zero(&self, row: &FeatureRow) -> f64 {
        let Some(model) = &self.model else {
            return 0.0;
        };
        match model.predict(row) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Optional model failed, defaulting to 0.0: {}", err);
                0.0
            }
        }
    }
}

/// Prediction service for yield and revenue per hectare
#[derive(Clone)]
pub struct PredictionService {
    yield_model: Arc<dyn Regressor>,
    revenue_model: OptionalModel,
}

impl PredictionService {
    pub fn new(yield_model: Arc<dyn Regressor>, revenue_model: OptionalModel) -> Self {
        Self {
            yield_model,
            revenue_model,
        }
    }

    /// Predict yield and revenue for a (state, season, crop) triple.
    ///
    /// The inputs are not checked against the training vocabulary; unseen
    /// categories are left to the model. A yield failure fails the request,
    /// a revenue failure only zeroes the revenue figure.
    pub fn predict(&self, request: &PredictRequest) -> AppResult<PredictResponse> {
        let row = FeatureRow::new(&request.state, &request.season, &request.crop);

        let predicted_yield = self.yield_model.predict(&row)?;
        let predicted_revenue = self.revenue_model.predict_or_zero(&row);

        tracing::debug!(
            state = %request.state,
            season = %request.season,
            crop = %request.crop,
            predicted_yield,
            predicted_revenue,
            "Prediction served"
        );

        Ok(PredictResponse {
            predicted_yield_kg_per_ha: round2(predicted_yield),
            predicted_revenue_rs_per_ha: round2(predicted_revenue),
        })
    }
}
