//! Shared types and models for the AgriVerse crop prediction platform
//!
//! This crate contains types shared between the backend service, the offline
//! training tools, and the browser frontend (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
