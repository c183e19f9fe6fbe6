//! Simulated real-time readings for a synthesized station.

use crate::series::{observe, HISTORY_DAYS};
use chrono::{DateTime, Datelike, Utc};
use dwlr_core::{station::Station, trend::Trend};
use dwlr_utils::numeric::round_to;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Outcome of one simulated reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpdate {
    pub station_id: String,
    pub previous_level: f64,
    pub new_level: f64,
    /// Drawn change in meters, two decimals
    pub change: f64,
    pub updated_at: DateTime<Utc>,
}

/// Range a single update's level change is drawn from.
pub fn change_range(trend: Trend) -> RangeInclusive<f64> {
    match trend {
        Trend::Falling => -0.5..=-0.1,
        Trend::Rising => 0.1..=0.5,
        Trend::Stable => -0.2..=0.2,
    }
}

/// Apply one simulated reading taken at `now` to `station`.
///
/// The level moves in the direction of the station's trend and never drops
/// below zero. The reading becomes the point for `now`'s date, replacing any
/// earlier reading that day and keeping dates in order when `now` falls
/// inside the existing history. The history keeps only the most recent
/// `HISTORY_DAYS` points.
pub fn simulate_update<R: Rng + ?Sized>(
    station: &mut Station,
    rng: &mut R,
    now: DateTime<Utc>,
) -> LevelUpdate {
    let previous_level = station.current_level;
    let change = rng.gen_range(change_range(station.trend));
    let new_level = round_to((previous_level + change).max(0.0), 2);

    let date = now.date_naive();
    let point = observe(date, new_level, f64::from(date.ordinal0()), rng);
    match station
        .historical_data
        .binary_search_by_key(&date, |existing| existing.date)
    {
        Ok(index) => station.historical_data[index] = point,
        Err(index) => station.historical_data.insert(index, point),
    }
    let excess = station.historical_data.len().saturating_sub(HISTORY_DAYS);
    station.historical_data.drain(..excess);

    station.current_level = new_level;
    station.last_updated = now;
    station.refresh_water_quality();
    debug!(
        "{}: {previous_level} -> {new_level} m",
        station.station_id
    );

    LevelUpdate {
        station_id: station.station_id.clone(),
        previous_level,
        new_level,
        change: round_to(change, 2),
        updated_at: now,
    }
}
