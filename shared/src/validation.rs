//! Parsing and normalisation utilities for AgriVerse
//!
//! Used by the training pipeline, the serving component, and the browser
//! frontend so that every side agrees on prices and lookup keys.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("price range '{0}' is not of the form 'min - max'")]
    PriceRange(String),
}

// ============================================================================
// Prices and Revenue
// ============================================================================

/// Average of a "min - max" price string such as `"1,850 - 2,100"`.
///
/// Thousands separators are removed before splitting on `-`. Anything past
/// the second part is ignored.
pub fn parse_average_price(price_range: &str) -> Result<f64, ParseError> {
    let cleaned = price_range.replace(',', "");
    let mut parts = cleaned.trim().split('-');

    let mut next_price = || -> Result<f64, ParseError> {
        parts
            .next()
            .and_then(|part| part.trim().parse::<f64>().ok())
            .ok_or_else(|| ParseError::PriceRange(price_range.to_string()))
    };

    let min_price = next_price()?;
    let max_price = next_price()?;
    Ok((min_price + max_price) / 2.0)
}

/// Revenue in Rs/ha for a yield in kg/ha and a price in Rs/quintal
pub fn estimated_revenue(yield_kg_per_ha: f64, average_price_per_qtl: f64) -> f64 {
    (yield_kg_per_ha / 100.0) * average_price_per_qtl
}

// ============================================================================
// Lookup Keys
// ============================================================================

/// Trimmed, lowercased form used for state/season lookups
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Round to two decimal places, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
