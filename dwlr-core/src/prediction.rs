use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    /// Meters, never negative
    pub predicted_level: f64,
    /// 0-1, non-increasing with horizon
    pub confidence: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// A station forecast as exchanged with the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub station_id: String,
    pub predictions: Vec<PredictionPoint>,
    /// Horizon in days
    pub forecast_period: u32,
    pub generated_at: DateTime<Utc>,
}
