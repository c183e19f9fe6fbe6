pub mod date_range;
pub mod error;
pub mod location;
pub mod prediction;
pub mod quality;
pub mod reading;
pub mod station;
pub mod trend;
