//! Prediction and recommendation request/response models

use serde::{Deserialize, Serialize};

use super::weather::WeatherSummary;

/// Request for a yield and revenue prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictRequest {
    pub state: String,
    pub season: String,
    pub crop: String,
}

/// Predicted outcome for a (state, season, crop) triple
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub predicted_yield_kg_per_ha: f64,
    /// Zero when no revenue model is available
    pub predicted_revenue_rs_per_ha: f64,
}

/// Request for a next-crop recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendRequest {
    pub state: String,
    pub current_season: String,
    pub current_crop: String,
    /// Absent or empty on the first call; the crops to score on the second
    #[serde(default)]
    pub candidates: Option<Vec<String>>,
}

impl RecommendRequest {
    /// Candidate crops to score, or `None` when the caller only wants context
    pub fn candidate_crops(&self) -> Option<&[String]> {
        match &self.candidates {
            Some(candidates) if !candidates.is_empty() => Some(candidates.as_slice()),
            _ => None,
        }
    }
}

/// Response to a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendResponse {
    /// Crop chosen from the submitted candidates
    Recommendation {
        next_season: String,
        recommended_crop: String,
        predicted_yield_kg_per_ha: f64,
    },
    /// Next season and its average weather, returned when no candidates were sent
    SeasonOutlook {
        next_season: String,
        weather: WeatherSummary,
    },
}

impl RecommendResponse {
    pub fn next_season(&self) -> &str {
        match self {
            RecommendResponse::Recommendation { next_season, .. } => next_season,
            RecommendResponse::SeasonOutlook { next_season, .. } => next_season,
        }
    }
}
