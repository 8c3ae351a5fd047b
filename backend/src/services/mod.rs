//! Business logic services for the AgriVerse platform

pub mod prediction;
pub mod recommendation;
pub mod weather;

pub use prediction::{OptionalModel, PredictionService};
pub use recommendation::RecommendationService;
pub use weather::{WeatherAverages, WeatherTable};
