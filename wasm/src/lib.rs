//! WebAssembly module for the AgriVerse crop planner
//!
//! Provides client-side helpers for:
//! - Season rotation preview
//! - Price range parsing and revenue estimates
//! - Building request bodies for the prediction API

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("AgriVerse helpers loaded"));
}

/// Season that follows `current`, or `undefined` for an unknown label
#[wasm_bindgen]
pub fn upcoming_season(current: &str) -> Option<String> {
    shared::next_season(current).map(|season| season.label().to_string())
}

/// All season labels the rotation understands
#[wasm_bindgen]
pub fn season_labels() -> Vec<String> {
    Season::ALL.iter().map(|season| season.label().to_string()).collect()
}

/// Key used by the server when matching state and season names
#[wasm_bindgen]
pub fn lookup_key(value: &str) -> String {
    normalize_key(value)
}

/// Average price in Rs/quintal of a "min - max" range
#[wasm_bindgen]
pub fn average_price(price_range: &str) -> Result<f64, JsValue> {
    parse_average_price(price_range).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Revenue in Rs/ha for a yield and a "min - max" price range, rounded to paise
#[wasm_bindgen]
pub fn revenue_for_range(yield_kg_per_ha: f64, price_range: &str) -> Result<f64, JsValue> {
    let price = average_price(price_range)?;
    Ok(round2(estimated_revenue(yield_kg_per_ha, price)))
}

/// JSON body for `POST /recommend`.
///
/// `candidates` is a comma-separated list; blank entries are dropped and an
/// empty list asks the server for the season outlook instead.
#[wasm_bindgen]
pub fn recommend_request_json(
    state: &str,
    current_season: &str,
    current_crop: &str,
    candidates: &str,
) -> Result<String, JsValue> {
    let request = build_recommend_request(state, current_season, current_crop, candidates);
    serde_json::to_string(&request).map_err(|e| JsValue::from_str(&format!("Invalid request: {}", e)))
}

fn build_recommend_request(
    state: &str,
    current_season: &str,
    current_crop: &str,
    candidates: &str,
) -> RecommendRequest {
    let crops: Vec<String> = candidates
        .split(',')
        .map(str::trim)
        .filter(|crop| !crop.is_empty())
        .map(str::to_string)
        .collect();

    RecommendRequest {
        state: state.trim().to_string(),
        current_season: current_season.trim().to_string(),
        current_crop: current_crop.trim().to_string(),
        candidates: (!crops.is_empty()).then_some(crops),
    }
}
