//! Station synthesis, forecasting and aggregation for DWLR groundwater data.
//!
//! Everything here is pure computation over in-memory data. Randomised
//! operations take the generator as a parameter so callers choose between
//! entropy in production and a fixed seed in tests.

pub mod aggregation;
pub mod analytics;
pub mod forecast;
pub mod sampler;
pub mod series;
pub mod simulation;
pub mod synthesizer;
