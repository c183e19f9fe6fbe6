//! Turning recorder CSV exports into stations.

use crate::synthesizer::{jitter, station_id, station_name, DEFAULT_JITTER_DEGREES};
use chrono::{DateTime, Utc};
use dwlr_core::{
    error::{DwlrError, Result},
    location::Location,
    reading::Reading,
    station::{HistoricalPoint, Station, StationStatus},
    trend::{Trend, DEFAULT_TREND_WINDOW},
};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of stations a reading file is split into by default.
pub const DEFAULT_AGGREGATED_STATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Upper bound on the number of stations built from one file
    pub station_count: usize,
    /// Trailing observations used to classify each station's trend
    pub trend_window: usize,
    pub jitter_degrees: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            station_count: DEFAULT_AGGREGATED_STATIONS,
            trend_window: DEFAULT_TREND_WINDOW,
            jitter_degrees: DEFAULT_JITTER_DEGREES,
        }
    }
}

impl AggregationConfig {
    pub fn with_station_count(mut self, station_count: usize) -> Self {
        self.station_count = station_count;
        self
    }

    pub fn with_trend_window(mut self, trend_window: usize) -> Self {
        self.trend_window = trend_window;
        self
    }
}

/// Chronological series with one point per date; a later reading for a date
/// replaces an earlier one.
fn daily_series(readings: &[Reading]) -> Vec<HistoricalPoint> {
    let mut series: Vec<HistoricalPoint> = Vec::with_capacity(readings.len());
    for reading in readings {
        let point = HistoricalPoint::from(reading);
        match series.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => series.push(point),
        }
    }
    series
}

/// Group readings into at most `config.station_count` active stations.
///
/// Readings are ordered by date (ties keep file order) and cut into
/// contiguous, equally sized slices; each slice becomes one station sited at
/// the next catalog location.
pub fn aggregate_readings<R: Rng + ?Sized>(
    readings: &[Reading],
    catalog: &[Location],
    config: &AggregationConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Vec<Station>> {
    if catalog.is_empty() {
        return Err(DwlrError::EmptyCatalog);
    }
    if config.station_count == 0 {
        return Err(DwlrError::InvalidStationCount(config.station_count));
    }
    if readings.is_empty() {
        info!("No readings to aggregate");
        return Ok(Vec::new());
    }

    let mut ordered = readings.to_vec();
    ordered.sort_by_key(|reading| reading.date);
    let slice_len = ordered.len().div_ceil(config.station_count);

    let mut stations = Vec::new();
    for (index, slice) in ordered.chunks(slice_len).enumerate() {
        let historical_data = daily_series(slice);
        let last = historical_data.last().ok_or(DwlrError::EmptySeries)?;
        let current_level = last.level;
        let water_quality = last.water_quality();
        let levels: Vec<f64> = historical_data.iter().map(|p| p.level).collect();
        let trend = Trend::classify_recent(&levels, config.trend_window);

        let location = &catalog[index % catalog.len()];
        let (latitude, longitude) = jitter(location, config.jitter_degrees, rng);
        let sequence = index + 1;
        debug!(
            "Station {sequence}: {} readings, {} days, trend {trend}",
            slice.len(),
            historical_data.len()
        );
        stations.push(Station {
            station_id: station_id(sequence, rng),
            name: station_name(sequence, rng),
            state: location.state.clone(),
            district: location.district.clone(),
            latitude,
            longitude,
            status: StationStatus::Active,
            current_level,
            trend,
            last_updated: now,
            historical_data,
            water_quality,
        });
    }
    info!(
        "Aggregated {} readings into {} stations",
        readings.len(),
        stations.len()
    );
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reading(day: u32, level: f64) -> Reading {
        Reading {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            water_level_m: level,
            temperature_c: 22.0,
            rainfall_mm: 1.5,
            ph: 7.0,
            dissolved_oxygen_mg_l: 8.0,
        }
    }

    fn catalog() -> Vec<Location> {
        vec![
            Location {
                state: "Bihar".to_string(),
                district: "Patna".to_string(),
                latitude: 25.5941,
                longitude: 85.1376,
            },
            Location {
                state: "Meghalaya".to_string(),
                district: "East Khasi Hills".to_string(),
                latitude: 25.5788,
                longitude: 91.8933,
            },
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_split_into_contiguous_stations() {
        let readings: Vec<Reading> = (1..=12).map(|d| reading(d, 10.0 + d as f64)).collect();
        let config = AggregationConfig::default().with_station_count(3);
        let mut rng = StdRng::seed_from_u64(1);
        let stations = aggregate_readings(&readings, &catalog(), &config, &mut rng, now()).unwrap();

        assert_eq!(stations.len(), 3);
        for (index, station) in stations.iter().enumerate() {
            assert!(station.is_valid());
            assert_eq!(station.historical_data.len(), 4);
            assert_eq!(station.status, StationStatus::Active);
            assert_eq!(station.state, catalog()[index % 2].state);
            assert_eq!(station.last_updated, now());
        }
        assert_eq!(stations[0].current_level, 14.0);
        assert_eq!(stations[2].current_level, 22.0);
        assert_eq!(
            stations[1].historical_data[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_unsorted_rows_and_duplicate_dates() {
        let readings = vec![
            reading(3, 9.0),
            reading(1, 10.0),
            reading(2, 9.8),
            reading(2, 9.6),
        ];
        let config = AggregationConfig::default().with_station_count(1);
        let mut rng = StdRng::seed_from_u64(2);
        let stations = aggregate_readings(&readings, &catalog(), &config, &mut rng, now()).unwrap();

        let station = &stations[0];
        assert!(station.is_valid());
        assert_eq!(station.levels(), vec![10.0, 9.6, 9.0]);
        assert_eq!(station.current_level, 9.0);
        assert_eq!(station.trend, Trend::Falling);
    }

    #[test]
    fn test_trend_uses_trailing_window() {
        // long decline, then a flat tail
        let mut readings: Vec<Reading> = (1..=10).map(|d| reading(d, 30.0 - 2.0 * d as f64)).collect();
        readings.extend((11..=15).map(|d| reading(d, 10.0)));
        let mut rng = StdRng::seed_from_u64(3);

        let windowed = AggregationConfig::default().with_station_count(1);
        let stations = aggregate_readings(&readings, &catalog(), &windowed, &mut rng, now()).unwrap();
        assert_eq!(stations[0].trend, Trend::Stable);

        let whole = windowed.with_trend_window(15);
        let stations = aggregate_readings(&readings, &catalog(), &whole, &mut rng, now()).unwrap();
        assert_eq!(stations[0].trend, Trend::Falling);
    }

    #[test]
    fn test_fewer_readings_than_stations() {
        let readings = vec![reading(1, 5.0), reading(2, 5.5)];
        let mut rng = StdRng::seed_from_u64(4);
        let stations =
            aggregate_readings(&readings, &catalog(), &AggregationConfig::default(), &mut rng, now())
                .unwrap();
        assert_eq!(stations.len(), 2);
        assert!(stations.iter().all(|s| s.historical_data.len() == 1));
        assert_ne!(stations[0].station_id, stations[1].station_id);
    }

    #[test]
    fn test_water_quality_from_last_reading() {
        let mut readings = vec![reading(1, 5.0), reading(2, 5.1)];
        readings[1].ph = 9.0;
        readings[1].dissolved_oxygen_mg_l = 2.0;
        let config = AggregationConfig::default().with_station_count(1);
        let mut rng = StdRng::seed_from_u64(5);
        let stations = aggregate_readings(&readings, &catalog(), &config, &mut rng, now()).unwrap();
        assert_eq!(stations[0].water_quality.quality_index, 40);
    }

    #[test]
    fn test_empty_inputs() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = AggregationConfig::default();
        assert!(aggregate_readings(&[], &catalog(), &config, &mut rng, now())
            .unwrap()
            .is_empty());
        assert!(matches!(
            aggregate_readings(&[reading(1, 1.0)], &[], &config, &mut rng, now()),
            Err(DwlrError::EmptyCatalog)
        ));
        assert!(matches!(
            aggregate_readings(
                &[reading(1, 1.0)],
                &catalog(),
                &config.clone().with_station_count(0),
                &mut rng,
                now()
            ),
            Err(DwlrError::InvalidStationCount(0))
        ));
    }
}
