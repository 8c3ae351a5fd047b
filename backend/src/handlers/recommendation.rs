//! HTTP handler for next-crop recommendations

use axum::{body::Bytes, extract::State, Json};
use shared::{RecommendRequest, RecommendResponse};

use crate::error::AppResult;
use crate::services::RecommendationService;
use crate::AppState;

/// Recommend the next crop.
///
/// Called once without `candidates` to learn the next season and its weather,
/// then again with the candidate crops to score.
pub async fn recommend(State(state): State<AppState>, body: Bytes) -> AppResult<Json<RecommendResponse>> {
    let input: RecommendRequest = serde_json::from_slice(&body)?;
    let service = RecommendationService::new(state.yield_model, state.weather);
    let response = service.recommend(&input)?;
    Ok(Json(response))
}
