//! HTTP handlers for the AgriVerse API

pub mod health;
pub mod prediction;
pub mod recommendation;

pub use health::{health_check, root};
pub use prediction::predict;
pub use recommendation::recommend;
