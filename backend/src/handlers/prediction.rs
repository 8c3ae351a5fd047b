//! HTTP handler for yield and revenue prediction

use axum::{body::Bytes, extract::State, Json};
use shared::{PredictRequest, PredictResponse};

use crate::error::AppResult;
use crate::services::PredictionService;
use crate::AppState;

/// Predict yield and revenue per hectare
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<PredictResponse>> {
    let input: PredictRequest = serde_json::from_slice(&body)?;
    let service = PredictionService::new(state.yield_model, state.revenue_model);
    let prediction = service.predict(&input)?;
    Ok(Json(prediction))
}
