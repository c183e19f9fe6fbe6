//! Water-level trend direction and the display-side trend classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative band around the first value of a window inside which a series
/// counts as stable.
pub const STABLE_BAND: f64 = 0.05;

/// Number of trailing observations inspected by `classify_recent` callers
/// that do not configure their own window.
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// Direction of recent water-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    /// Classify the change from `first` to `last` with a relative ±5% band:
    /// rising above `first × 1.05`, falling below `first × 0.95`, otherwise stable.
    pub fn classify(first: f64, last: f64) -> Trend {
        if last > first * (1.0 + STABLE_BAND) {
            Trend::Rising
        } else if last < first * (1.0 - STABLE_BAND) {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }

    /// Classify the trailing `window` values of a chronological series.
    ///
    /// Windows with fewer than two values are stable.
    pub fn classify_recent(levels: &[f64], window: usize) -> Trend {
        let start = levels.len().saturating_sub(window);
        match &levels[start..] {
            [first, .., last] => Trend::classify(*first, *last),
            _ => Trend::Stable,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rising" => Ok(Trend::Rising),
            "falling" => Ok(Trend::Falling),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("unknown trend: {other}")),
        }
    }
}
