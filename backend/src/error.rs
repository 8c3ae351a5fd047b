//! Error handling for the AgriVerse platform
//!
//! Every request-scoped failure becomes a JSON body of the form
//! `{"error": "..."}` with a status code that tells the failure classes apart.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ml::ModelError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client errors
    #[error("Missing field: '{0}'")]
    MissingField(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("Unknown season '{0}'")]
    UnknownSeason(String),

    // Lookup errors
    #[error("No weather averages for {state} in {season}")]
    WeatherNotFound { state: String, season: String },

    #[error("No predictions could be made for candidates")]
    NoCandidateScored,

    // Unavailable subsystems
    #[error("Average weather data not available")]
    WeatherUnavailable,

    // Model errors
    #[error("Prediction failed: {0}")]
    Prediction(#[from] ModelError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) | AppError::InvalidBody(_) | AppError::UnknownSeason(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::WeatherNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::NoCandidateScored => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::WeatherUnavailable
            | AppError::Prediction(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match missing_field_name(&err.to_string()) {
            Some(field) => AppError::MissingField(field),
            None => AppError::InvalidBody(err.to_string()),
        }
    }
}

/// Pull the field name out of serde's "missing field `name`" message
fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
