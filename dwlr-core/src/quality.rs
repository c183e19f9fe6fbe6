//! Water-quality scoring from pH and dissolved oxygen.
//!
//! The index is the mean of two 0-100 factors: a pH factor that peaks at
//! neutral water and falls 20 points per pH unit away from 7.0, and a
//! dissolved-oxygen factor that saturates at 10 mg/L. Out-of-range inputs
//! are clamped through the factors rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// pH at which the pH factor peaks.
pub const NEUTRAL_PH: f64 = 7.0;

/// Points lost per pH unit of distance from neutral.
const PH_PENALTY_PER_UNIT: f64 = 20.0;

/// Dissolved oxygen (mg/L) at which the oxygen factor saturates.
const DO_SATURATION_MG_L: f64 = 10.0;

/// Categorical water-quality status, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityStatus {
    /// Map a quality index to its status. Thresholds are inclusive lower
    /// bounds: 80 excellent, 60 good, 40 fair, anything below is poor.
    pub fn from_index(index: u8) -> QualityStatus {
        match index {
            80..=u8::MAX => QualityStatus::Excellent,
            60..=79 => QualityStatus::Good,
            40..=59 => QualityStatus::Fair,
            _ => QualityStatus::Poor,
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityStatus::Excellent => write!(f, "excellent"),
            QualityStatus::Good => write!(f, "good"),
            QualityStatus::Fair => write!(f, "fair"),
            QualityStatus::Poor => write!(f, "poor"),
        }
    }
}

/// Latest water-quality snapshot for a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQuality {
    #[serde(rename = "pH")]
    pub ph: f64,
    /// mg/L
    pub dissolved_oxygen: f64,
    /// 0-100
    pub quality_index: u8,
    pub status: QualityStatus,
}

/// `max(0, 100 − |pH − 7| × 20)`: 100 at neutral, 0 at pH ≤ 2 or ≥ 12.
pub fn ph_factor(ph: f64) -> f64 {
    (100.0 - (ph - NEUTRAL_PH).abs() * PH_PENALTY_PER_UNIT).max(0.0)
}

/// `min(100, do × 10)`, written as a percentage of saturation.
pub fn dissolved_oxygen_factor(dissolved_oxygen: f64) -> f64 {
    (dissolved_oxygen / DO_SATURATION_MG_L * 100.0).min(100.0)
}

/// Combined 0-100 quality index, rounded to the nearest integer.
pub fn quality_index(ph: f64, dissolved_oxygen: f64) -> u8 {
    let combined = (ph_factor(ph) + dissolved_oxygen_factor(dissolved_oxygen)) / 2.0;
    // NaN inputs saturate to 0 through the cast
    combined.round().clamp(0.0, 100.0) as u8
}

/// Score a (pH, dissolved oxygen) pair.
pub fn assess(ph: f64, dissolved_oxygen: f64) -> WaterQuality {
    let index = quality_index(ph, dissolved_oxygen);
    WaterQuality {
        ph,
        dissolved_oxygen,
        quality_index: index,
        status: QualityStatus::from_index(index),
    }
}
