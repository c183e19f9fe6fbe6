//! Synthetic daily histories that converge on a station's current level.
//!
//! A falling station starts the window above its current level and drifts
//! down toward it; a rising station starts below and drifts up; a stable
//! station scatters around it. The drift is `DRIFT_PER_DAY` per day of
//! distance from the end of the window, so its direction survives the noise
//! in a least-squares fit of the series.

use chrono::NaiveDate;
use dwlr_core::{
    date_range::DateRange,
    error::{DwlrError, Result},
    station::HistoricalPoint,
    trend::Trend,
};
use dwlr_utils::numeric::round_to;
use rand::Rng;
use std::f64::consts::PI;

/// Length of a synthesized history window.
pub const HISTORY_DAYS: usize = 90;

/// Level drift per day of distance from the end of the window, in meters.
pub const DRIFT_PER_DAY: f64 = 0.02;

/// Lowest level a synthesized point may take before the seasonal term.
pub const MIN_LEVEL: f64 = 0.5;

const SEASONAL_AMPLITUDE: f64 = 0.5;
const DIRECTIONAL_NOISE: f64 = 0.5;
const STABLE_NOISE: f64 = 1.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// `sin(2π·day/365)`
pub fn annual_cycle(day: f64) -> f64 {
    (2.0 * PI * day / DAYS_PER_YEAR).sin()
}

/// Draw the non-level measurements for a day and attach them to `level`.
///
/// Temperature follows the annual cycle at `phase_day`; rainfall, pH and
/// dissolved oxygen are independent uniform draws.
pub fn observe<R: Rng + ?Sized>(
    date: NaiveDate,
    level: f64,
    phase_day: f64,
    rng: &mut R,
) -> HistoricalPoint {
    HistoricalPoint {
        date,
        level,
        temperature: round_to(20.0 + rng.gen_range(0.0..15.0) + 5.0 * annual_cycle(phase_day), 1),
        rainfall: round_to(rng.gen_range(0.0..50.0), 1),
        ph: round_to(6.5 + rng.gen_range(0.0..2.0), 1),
        dissolved_oxygen: round_to(4.0 + rng.gen_range(0.0..6.0), 1),
    }
}

/// Generate `days` daily points ending on `end`, converging on
/// `current_level` in the direction given by `trend`.
pub fn generate_history<R: Rng + ?Sized>(
    current_level: f64,
    trend: Trend,
    end: NaiveDate,
    days: usize,
    rng: &mut R,
) -> Result<Vec<HistoricalPoint>> {
    if !current_level.is_finite() || current_level < 0.0 {
        return Err(DwlrError::InvalidCurrentLevel(current_level));
    }
    if days == 0 {
        return Err(DwlrError::InvalidHistoryLength(days));
    }

    let history = DateRange::ending(end, days)
        .enumerate()
        .map(|(i, date)| {
            let distance = (days - i) as f64 * DRIFT_PER_DAY;
            let base = match trend {
                Trend::Falling => {
                    current_level + distance + rng.gen_range(-DIRECTIONAL_NOISE..DIRECTIONAL_NOISE)
                }
                Trend::Rising => {
                    current_level - distance + rng.gen_range(-DIRECTIONAL_NOISE..DIRECTIONAL_NOISE)
                }
                Trend::Stable => current_level + rng.gen_range(-STABLE_NOISE..STABLE_NOISE),
            }
            .max(MIN_LEVEL);
            let level = round_to(base + SEASONAL_AMPLITUDE * annual_cycle(i as f64), 2);
            observe(date, level, i as f64, rng)
        })
        .collect();
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwlr_utils::numeric::ols_slope;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn levels(points: &[HistoricalPoint]) -> Vec<f64> {
        points.iter().map(|p| p.level).collect()
    }

    #[test]
    fn test_history_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let history =
            generate_history(20.0, Trend::Stable, end_date(), HISTORY_DAYS, &mut rng).unwrap();
        assert_eq!(history.len(), HISTORY_DAYS);
        assert_eq!(history.last().unwrap().date, end_date());
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        assert!(history.windows(2).all(|w| (w[1].date - w[0].date).num_days() == 1));
    }

    #[test]
    fn test_measurement_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for trend in [Trend::Rising, Trend::Falling, Trend::Stable] {
            let history =
                generate_history(1.0, trend, end_date(), HISTORY_DAYS, &mut rng).unwrap();
            for point in &history {
                // floor applies before the seasonal term, which never subtracts
                // inside the first quarter of the annual cycle
                assert!(point.level >= MIN_LEVEL, "level {}", point.level);
                assert!((15.0..=40.0).contains(&point.temperature));
                assert!((0.0..=50.0).contains(&point.rainfall));
                assert!((6.5..=8.5).contains(&point.ph));
                assert!((4.0..=10.0).contains(&point.dissolved_oxygen));
            }
        }
    }

    #[test]
    fn test_levels_are_rounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let history =
            generate_history(33.3, Trend::Rising, end_date(), HISTORY_DAYS, &mut rng).unwrap();
        for point in &history {
            assert_eq!(round_to(point.level, 2), point.level);
            assert_eq!(round_to(point.temperature, 1), point.temperature);
        }
    }

    #[test]
    fn test_falling_series_starts_higher_on_average() {
        let mut rng = StdRng::seed_from_u64(2024);
        let runs = 200;
        let mut first_total = 0.0;
        let mut last_total = 0.0;
        for _ in 0..runs {
            let history =
                generate_history(25.0, Trend::Falling, end_date(), HISTORY_DAYS, &mut rng).unwrap();
            first_total += history[0].level;
            last_total += history[HISTORY_DAYS - 1].level;
        }
        let mean_gap = (first_total - last_total) / runs as f64;
        // expected gap ≈ 89 × 0.02 − 0.5 × sin(2π·89/365) ≈ 1.28 m
        assert!(mean_gap > 1.0, "mean gap {mean_gap}");
    }

    #[test]
    fn test_trend_direction_visible_in_linear_fit() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let falling =
                generate_history(30.0, Trend::Falling, end_date(), HISTORY_DAYS, &mut rng).unwrap();
            let rising =
                generate_history(30.0, Trend::Rising, end_date(), HISTORY_DAYS, &mut rng).unwrap();
            assert!(ols_slope(&levels(&falling)) < 0.0);
            assert!(ols_slope(&levels(&rising)) > 0.0);
        }
    }

    #[test]
    fn test_stable_series_stays_near_current_level() {
        let mut rng = StdRng::seed_from_u64(5);
        let history =
            generate_history(12.0, Trend::Stable, end_date(), HISTORY_DAYS, &mut rng).unwrap();
        assert!(history
            .iter()
            .all(|p| (p.level - 12.0).abs() <= STABLE_NOISE + SEASONAL_AMPLITUDE + 0.01));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                generate_history(bad, Trend::Stable, end_date(), HISTORY_DAYS, &mut rng),
                Err(DwlrError::InvalidCurrentLevel(_))
            ));
        }
        assert!(matches!(
            generate_history(10.0, Trend::Stable, end_date(), 0, &mut rng),
            Err(DwlrError::InvalidHistoryLength(0))
        ));
    }

    #[test]
    fn test_zero_level_is_floored() {
        let mut rng = StdRng::seed_from_u64(8);
        let history =
            generate_history(0.0, Trend::Rising, end_date(), HISTORY_DAYS, &mut rng).unwrap();
        assert!(history.iter().all(|p| p.level >= MIN_LEVEL));
    }
}
