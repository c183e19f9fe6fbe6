use crate::{
    quality::{self, WaterQuality},
    trend::Trend,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational state of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationStatus::Active => write!(f, "active"),
            StationStatus::Inactive => write!(f, "inactive"),
            StationStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl FromStr for StationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(StationStatus::Active),
            "inactive" => Ok(StationStatus::Inactive),
            "maintenance" => Ok(StationStatus::Maintenance),
            other => Err(format!("unknown station status: {other}")),
        }
    }
}

/// One day's observation at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    /// Water level in meters
    pub level: f64,
    /// °C
    pub temperature: f64,
    /// mm
    pub rainfall: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    /// mg/L
    pub dissolved_oxygen: f64,
}

impl HistoricalPoint {
    /// Water quality derived from this point's chemistry.
    pub fn water_quality(&self) -> WaterQuality {
        quality::assess(self.ph, self.dissolved_oxygen)
    }
}

/// A Digital Water Level Recorder (DWLR) monitoring station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub state: String,
    pub district: String,
    /// Decimal degrees
    pub latitude: f64,
    /// Decimal degrees
    pub longitude: f64,
    pub status: StationStatus,
    /// Meters
    pub current_level: f64,
    pub trend: Trend,
    pub last_updated: DateTime<Utc>,
    /// Ascending by date, one point per day
    pub historical_data: Vec<HistoricalPoint>,
    pub water_quality: WaterQuality,
}

impl Station {
    /// Most recent historical observation.
    pub fn latest_point(&self) -> Option<&HistoricalPoint> {
        self.historical_data.last()
    }

    /// Date of the most recent historical observation.
    pub fn last_observed_date(&self) -> Option<NaiveDate> {
        self.latest_point().map(|point| point.date)
    }

    /// Historical levels in chronological order.
    pub fn levels(&self) -> Vec<f64> {
        self.historical_data.iter().map(|point| point.level).collect()
    }

    /// A station is usable when it has at least one observation and its
    /// dates are strictly increasing.
    pub fn is_valid(&self) -> bool {
        !self.historical_data.is_empty()
            && self
                .historical_data
                .windows(2)
                .all(|pair| pair[0].date < pair[1].date)
    }

    /// Re-derive `water_quality` from the latest observation.
    pub fn refresh_water_quality(&mut self) {
        if let Some(point) = self.latest_point() {
            self.water_quality = point.water_quality();
        }
    }
}

/// Selection criteria for station listings.
///
/// `state` and `district` match case-insensitive substrings; `status` and
/// `trend` must match exactly. Unset criteria accept every station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationFilter {
    pub state: Option<String>,
    pub district: Option<String>,
    pub status: Option<StationStatus>,
    pub trend: Option<Trend>,
}

impl StationFilter {
    pub fn matches(&self, station: &Station) -> bool {
        fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        self.state
            .as_deref()
            .map_or(true, |state| contains_ignore_case(&station.state, state))
            && self
                .district
                .as_deref()
                .map_or(true, |district| contains_ignore_case(&station.district, district))
            && self.status.map_or(true, |status| station.status == status)
            && self.trend.map_or(true, |trend| station.trend == trend)
    }

    /// Stations accepted by this filter, in their original order.
    pub fn apply<'a>(&self, stations: &'a [Station]) -> Vec<&'a Station> {
        stations.iter().filter(|station| self.matches(station)).collect()
    }
}
