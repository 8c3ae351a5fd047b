//! AgriVerse crop prediction backend
//!
//! Serves yield, revenue and next-crop recommendations from models trained
//! offline on historical crop and weather records.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ml;
pub mod routes;
pub mod services;
pub mod state;
pub mod training;

pub use config::Config;
pub use routes::create_app;
pub use state::AppState;
