//! Linear-trend plus seasonal water-level forecasts.

use chrono::{DateTime, NaiveDate, Utc};
use dwlr_core::{
    date_range::DateRange,
    error::{DwlrError, Result},
    prediction::{Forecast, PredictionPoint},
    station::Station,
};
use dwlr_utils::{
    dates::days_after,
    numeric::{ols_slope, round_to, std_dev},
};
use log::debug;
use rand::Rng;
use std::f64::consts::PI;

/// Forecast horizon used when the caller does not choose one.
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Fraction of the fitted daily slope applied per forecast day.
pub const TREND_SCALE: f64 = 0.01;

const SEASONAL_AMPLITUDE: f64 = 0.1;
const NOISE: f64 = 0.025;
const CONFIDENCE_DECAY_PER_DAY: f64 = 0.01;

/// Confidence never decays below this value.
pub const CONFIDENCE_FLOOR: f64 = 0.5;

/// Half-width of the prediction envelope as a fraction of the historical
/// standard deviation.
pub const BOUND_FRACTION: f64 = 0.5;

/// `max(0.5, 1 − 0.01·day)`, rounded to two decimals.
pub fn confidence_for_day(day: u32) -> f64 {
    round_to(
        (1.0 - f64::from(day) * CONFIDENCE_DECAY_PER_DAY).max(CONFIDENCE_FLOOR),
        2,
    )
}

/// Lazily produced forecast days following a series.
///
/// Each call to `next` draws one noise term from the generator.
pub struct ForecastDays<'r, R: Rng + ?Sized> {
    last_level: f64,
    dates: DateRange,
    slope: f64,
    spread: f64,
    day: u32,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> ForecastDays<'r, R> {
    /// Set up a `days`-long forecast from a chronological level series whose
    /// final observation falls on `last_date`.
    pub fn new(levels: &[f64], last_date: NaiveDate, days: u32, rng: &'r mut R) -> Result<Self> {
        let last_level = *levels.last().ok_or(DwlrError::EmptySeries)?;
        // every forecast day must be a representable date
        if days == 0 || days_after(last_date, u64::from(days)).is_none() {
            return Err(DwlrError::InvalidHorizon(days));
        }
        Ok(ForecastDays {
            last_level,
            dates: DateRange::following(last_date, days as usize),
            slope: ols_slope(levels),
            spread: std_dev(levels).unwrap_or(0.0) * BOUND_FRACTION,
            day: 0,
            rng,
        })
    }

    /// Least-squares slope of the input series, in meters per observation.
    pub fn slope(&self) -> f64 {
        self.slope
    }
}

impl<'r, R: Rng + ?Sized> Iterator for ForecastDays<'r, R> {
    type Item = PredictionPoint;

    fn next(&mut self) -> Option<PredictionPoint> {
        let date = self.dates.next()?;
        self.day += 1;
        let day = self.day;

        let step = f64::from(day);
        let trend_factor = self.slope * step * TREND_SCALE;
        let seasonal_factor = SEASONAL_AMPLITUDE * (2.0 * PI * step / 365.0).sin();
        let random_factor = self.rng.gen_range(-NOISE..=NOISE);
        let level = (self.last_level + trend_factor + seasonal_factor + random_factor).max(0.0);

        Some(PredictionPoint {
            date,
            predicted_level: round_to(level, 3),
            confidence: confidence_for_day(day),
            lower_bound: round_to((level - self.spread).max(0.0), 3),
            upper_bound: round_to(level + self.spread, 3),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.dates.size_hint()
    }
}

/// Forecast `days` points after a chronological level series ending on `last_date`.
///
/// An empty series is rejected, as is a zero horizon or one running past the
/// last representable date. A single observation is forecast with a flat trend.
pub fn forecast_levels<R: Rng + ?Sized>(
    levels: &[f64],
    last_date: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Result<Vec<PredictionPoint>> {
    Ok(ForecastDays::new(levels, last_date, days, rng)?.collect())
}

/// Forecast a station's historical series as the prediction endpoint returns it.
pub fn forecast_station<R: Rng + ?Sized>(
    station: &Station,
    days: u32,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Forecast> {
    let last_date = station.last_observed_date().ok_or(DwlrError::EmptySeries)?;
    let levels = station.levels();
    let forecast = ForecastDays::new(&levels, last_date, days, rng)?;
    debug!(
        "Forecasting {} for {} days (slope {:.4} m/day)",
        station.station_id,
        days,
        forecast.slope()
    );
    Ok(Forecast {
        station_id: station.station_id.clone(),
        predictions: forecast.collect(),
        forecast_period: days,
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dwlr_core::{station::HistoricalPoint, trend::Trend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn last_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn test_flat_series_stays_near_level() {
        let mut rng = StdRng::seed_from_u64(1);
        let predictions = forecast_levels(&[10.0; 5], last_date(), 30, &mut rng).unwrap();
        assert_eq!(predictions.len(), 30);
        for point in &predictions {
            assert!((point.predicted_level - 10.0).abs() <= 0.2, "{point:?}");
            // no spread in a flat series
            assert_eq!(point.lower_bound, point.predicted_level);
            assert_eq!(point.upper_bound, point.predicted_level);
        }
    }

    #[test]
    fn test_confidence_decay() {
        let mut rng = StdRng::seed_from_u64(2);
        let predictions = forecast_levels(&[10.0; 5], last_date(), 90, &mut rng).unwrap();
        assert_eq!(predictions[0].confidence, 0.99);
        assert!(predictions
            .windows(2)
            .all(|pair| pair[1].confidence <= pair[0].confidence));
        assert!(predictions[49..].iter().all(|p| p.confidence == CONFIDENCE_FLOOR));
        assert!(predictions[48].confidence > CONFIDENCE_FLOOR);
        assert_eq!(confidence_for_day(50), 0.5);
        assert_eq!(confidence_for_day(10_000), 0.5);
    }

    #[test]
    fn test_dates_follow_last_observation() {
        let mut rng = StdRng::seed_from_u64(3);
        for days in [1, 7, 45] {
            let predictions =
                forecast_levels(&[3.0, 3.5, 4.0], last_date(), days, &mut rng).unwrap();
            assert_eq!(predictions.len(), days as usize);
            assert_eq!(predictions[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
            assert!(predictions
                .windows(2)
                .all(|pair| (pair[1].date - pair[0].date).num_days() == 1));
        }
    }

    #[test]
    fn test_declining_series_end_to_end() {
        // 90 points from 20.0 down to 10.0
        let levels: Vec<f64> = (0..90).map(|i| 20.0 - 10.0 * i as f64 / 89.0).collect();
        let mut rng = StdRng::seed_from_u64(4);
        let predictions = forecast_levels(&levels, last_date(), 30, &mut rng).unwrap();
        let day_30 = predictions[29].predicted_level;
        assert!((day_30 - 9.97).abs() <= 0.15, "day 30 level {day_30}");
        for point in &predictions {
            assert!(point.lower_bound < point.predicted_level);
            assert!(point.upper_bound > point.predicted_level);
        }
    }

    #[test]
    fn test_single_point_has_zero_slope() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut forecast = ForecastDays::new(&[7.5], last_date(), 10, &mut rng).unwrap();
        assert_eq!(forecast.slope(), 0.0);
        assert!(forecast.all(|p| (p.predicted_level - 7.5).abs() <= 0.1 + NOISE + 1e-9));
    }

    #[test]
    fn test_levels_never_negative() {
        let mut rng = StdRng::seed_from_u64(6);
        let predictions = forecast_levels(&[0.0; 4], last_date(), 30, &mut rng).unwrap();
        assert!(predictions
            .iter()
            .all(|p| p.predicted_level >= 0.0 && p.lower_bound >= 0.0));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            forecast_levels(&[], last_date(), 30, &mut rng),
            Err(DwlrError::EmptySeries)
        ));
        assert!(matches!(
            forecast_levels(&[1.0, 2.0], last_date(), 0, &mut rng),
            Err(DwlrError::InvalidHorizon(0))
        ));
    }

    #[test]
    fn test_horizon_past_calendar_end_is_rejected() {
        let mut rng = StdRng::seed_from_u64(10);
        let near_end = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(forecast_levels(&[4.0], near_end, 1, &mut rng).unwrap().len(), 1);
        assert!(matches!(
            forecast_levels(&[4.0], near_end, 2, &mut rng),
            Err(DwlrError::InvalidHorizon(2))
        ));
        assert!(matches!(
            forecast_levels(&[4.0], NaiveDate::MAX, 1, &mut rng),
            Err(DwlrError::InvalidHorizon(1))
        ));
    }

    #[test]
    fn test_same_seed_same_forecast() {
        let levels = [12.0, 11.8, 11.9, 11.5];
        let a = forecast_levels(&levels, last_date(), 20, &mut StdRng::seed_from_u64(8)).unwrap();
        let b = forecast_levels(&levels, last_date(), 20, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_forecast_station() {
        let historical_data: Vec<HistoricalPoint> = (1..=3)
            .map(|day| HistoricalPoint {
                date: NaiveDate::from_ymd_opt(2024, 3, 28 + day).unwrap(),
                level: 15.0,
                temperature: 25.0,
                rainfall: 0.0,
                ph: 7.0,
                dissolved_oxygen: 8.0,
            })
            .collect();
        let water_quality = historical_data[2].water_quality();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let mut station = Station {
            station_id: "DWLR0042QX7Z".to_string(),
            name: "Park Area Monitor 42".to_string(),
            state: "Bihar".to_string(),
            district: "Patna".to_string(),
            latitude: 25.59,
            longitude: 85.13,
            status: dwlr_core::station::StationStatus::Active,
            current_level: 15.0,
            trend: Trend::Stable,
            last_updated: now,
            historical_data,
            water_quality,
        };

        let mut rng = StdRng::seed_from_u64(9);
        let forecast = forecast_station(&station, 14, &mut rng, now).unwrap();
        assert_eq!(forecast.station_id, "DWLR0042QX7Z");
        assert_eq!(forecast.forecast_period, 14);
        assert_eq!(forecast.predictions.len(), 14);
        assert_eq!(forecast.predictions[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(forecast.generated_at, now);

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["predictions"][0]["date"], "2024-04-01");
        assert!(json["predictions"][0]["predicted_level"].is_number());

        station.historical_data.clear();
        assert!(matches!(
            forecast_station(&station, 14, &mut rng, now),
            Err(DwlrError::EmptySeries)
        ));
    }
}
