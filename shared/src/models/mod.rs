//! Domain models for the AgriVerse crop prediction platform

mod prediction;
mod record;
mod season;
mod weather;

pub use prediction::*;
pub use record::*;
pub use season::*;
pub use weather::*;
