//! Shared utility functions for DWLR crates.

/// Date utility functions
pub mod dates {
    use chrono::{Days, NaiveDate, NaiveDateTime};

    /// Date formats accepted from field CSV exports, tried in order.
    const ACCEPTED_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

    /// Parse a date as it appears in recorder exports.
    ///
    /// Accepts the plain date layouts in `ACCEPTED_DATE_FORMATS` as well as
    /// ISO 8601 timestamps ("2024-03-01T06:00:00"), whose time part is dropped.
    pub fn parse_date_lenient(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        for format in ACCEPTED_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date);
            }
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(timestamp.date());
        }
        if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(trimmed) {
            return Ok(timestamp.date_naive());
        }
        anyhow::bail!("unrecognised date: {trimmed:?}")
    }

    /// The date `offset` days after `date`, or `None` past the end of the calendar.
    pub fn days_after(date: NaiveDate, offset: u64) -> Option<NaiveDate> {
        date.checked_add_days(Days::new(offset))
    }

}

/// Numeric helpers shared by the synthesizer and forecaster.
pub mod numeric {
    /// Round `value` to `places` decimal places.
    pub fn round_to(value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }

    /// Arithmetic mean, or `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Population standard deviation, or `None` for an empty slice.
    pub fn std_dev(values: &[f64]) -> Option<f64> {
        let mu = mean(values)?;
        let variance =
            values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
        Some(variance.sqrt())
    }

    /// Ordinary least-squares slope of `values` against their 0-based index.
    ///
    /// `slope = (n·Σxy − Σx·Σy) / (n·Σxx − (Σx)²)`
    ///
    /// Fewer than two points have no defined slope; 0.0 is returned.
    pub fn ols_slope(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return 0.0;
        }
        let n_f = n as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
        for (i, y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }
        let denominator = n_f * sum_xx - sum_x * sum_x;
        if denominator == 0.0 {
            return 0.0;
        }
        (n_f * sum_xy - sum_x * sum_y) / denominator
    }

}
