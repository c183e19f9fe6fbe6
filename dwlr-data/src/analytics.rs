//! Network-wide summary figures for a station population.

use dwlr_core::{
    station::{Station, StationStatus},
    trend::Trend,
};
use dwlr_utils::numeric::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendDistribution {
    pub falling: usize,
    pub rising: usize,
    pub stable: usize,
}

impl TrendDistribution {
    fn record(&mut self, trend: Trend) {
        match trend {
            Trend::Falling => self.falling += 1,
            Trend::Rising => self.rising += 1,
            Trend::Stable => self.stable += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateStatistics {
    pub state: String,
    /// Mean current level in meters, two decimals
    pub average_level: f64,
    pub station_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_stations: usize,
    pub active_stations: usize,
    pub trend_distribution: TrendDistribution,
    /// Deepest average level first
    pub state_statistics: Vec<StateStatistics>,
}

/// Summarize station counts, trends and per-state levels.
pub fn summarize(stations: &[Station]) -> AnalyticsSummary {
    let mut trend_distribution = TrendDistribution::default();
    let mut by_state: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for station in stations {
        trend_distribution.record(station.trend);
        let entry = by_state.entry(station.state.as_str()).or_insert((0.0, 0));
        entry.0 += station.current_level;
        entry.1 += 1;
    }

    let mut state_statistics: Vec<StateStatistics> = by_state
        .into_iter()
        .map(|(state, (total, count))| StateStatistics {
            state: state.to_string(),
            average_level: round_to(total / count as f64, 2),
            station_count: count,
        })
        .collect();
    state_statistics.sort_by(|a, b| {
        b.average_level
            .total_cmp(&a.average_level)
            .then_with(|| a.state.cmp(&b.state))
    });

    AnalyticsSummary {
        total_stations: stations.len(),
        active_stations: stations
            .iter()
            .filter(|station| station.status == StationStatus::Active)
            .count(),
        trend_distribution,
        state_statistics,
    }
}
