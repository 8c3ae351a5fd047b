//! Liveness and health check handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub avg_weather_loaded: bool,
    pub avg_weather_path: String,
    pub revenue_model_loaded: bool,
}

/// Root endpoint
pub async fn root() -> &'static str {
    "AgriVerse ML API is running."
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        avg_weather_loaded: state.weather.is_available(),
        avg_weather_path: state.config.artifacts.avg_weather_path().display().to_string(),
        revenue_model_loaded: state.revenue_model.is_available(),
    })
}
