//! Next-crop recommendation service
//!
//! The recommendation flow has two phases. Without candidates the caller gets
//! the next season in the rotation and its average weather; with candidates
//! each crop is scored by the yield model under that weather and the best one
//! is returned.

use std::sync::Arc;

use shared::{next_season, round2, FeatureRow, RecommendRequest, RecommendResponse, Season, WeatherSummary};

use crate::error::{AppError, AppResult};
use crate::ml::Regressor;
use crate::services::weather::WeatherAverages;

/// Best candidate found while scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCrop<'a> {
    pub crop: &'a str,
    pub predicted_yield: f64,
}

/// Recommendation service
#[derive(Clone)]
pub struct RecommendationService {
    yield_model: Arc<dyn Regressor>,
    weather: Arc<WeatherAverages>,
}

impl RecommendationService {
    pub fn new(yield_model: Arc<dyn Regressor>, weather: Arc<WeatherAverages>) -> Self {
        Self { yield_model, weather }
    }

    /// Run either phase of the recommendation flow
    pub fn recommend(&self, request: &RecommendRequest) -> AppResult<RecommendResponse> {
        let season = next_season(&request.current_season)
            .ok_or_else(|| AppError::UnknownSeason(request.current_season.clone()))?;

        let weather = self.weather_for(&request.state, season)?;

        let Some(candidates) = request.candidate_crops() else {
            return Ok(RecommendResponse::SeasonOutlook {
                next_season: season.label().to_string(),
                weather,
            });
        };

        let best = self
            .best_candidate(&request.state, season, weather, candidates)
            .ok_or(AppError::NoCandidateScored)?;

        tracing::info!(
            state = %request.state,
            current_crop = %request.current_crop,
            next_season = %season,
            recommended_crop = best.crop,
            predicted_yield = best.predicted_yield,
            "Recommendation served"
        );

        Ok(RecommendResponse::Recommendation {
            next_season: season.label().to_string(),
            recommended_crop: best.crop.to_string(),
            predicted_yield_kg_per_ha: round2(best.predicted_yield),
        })
    }

    /// Average weather for `state` in `season`
    pub fn weather_for(&self, state: &str, season: Season) -> AppResult<WeatherSummary> {
        let table = self.weather.table().ok_or(AppError::WeatherUnavailable)?;
        table
            .lookup(state, season.label())
            .copied()
            .ok_or_else(|| AppError::WeatherNotFound {
                state: state.to_string(),
                season: season.label().to_string(),
            })
    }

    /// Highest predicted yield among the candidates that could be scored.
    ///
    /// Candidates whose prediction fails are skipped. A later candidate only
    /// replaces the current best when its yield is strictly greater, so ties
    /// keep the first-listed crop.
    pub fn best_candidate<'a>(
        &self,
        state: &str,
        season: Season,
        weather: WeatherSummary,
        candidates: &'a [String],
    ) -> Option<ScoredCrop<'a>> {
        candidates.iter().fold(None, |best, crop| {
            let row = FeatureRow::new(state, season.label(), crop.as_str()).with_weather(weather);
            match self.yield_model.predict(&row) {
                Ok(predicted_yield) => {
                    let improves = best
                        .as_ref()
                        .map_or(true, |current: &ScoredCrop| predicted_yield > current.predicted_yield);
                    if improves {
                        Some(ScoredCrop {
                            crop: crop.as_str(),
                            predicted_yield,
                        })
                    } else {
                        best
                    }
                }
                Err(err) => {
                    tracing::debug!(crop = %crop, "Skipping candidate that could not be scored: {}", err);
                    best
                }
            }
        })
    }
}
