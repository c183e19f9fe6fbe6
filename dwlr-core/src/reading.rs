use crate::{
    error::{DwlrError, Result},
    station::HistoricalPoint,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use dwlr_utils::dates::parse_date_lenient;
use log::{info, warn};

/// Column headers of a recorder export, in order.
pub const READING_COLUMNS: [&str; 6] = [
    "Date",
    "Water_Level_m",
    "Temperature_C",
    "Rainfall_mm",
    "pH",
    "Dissolved_Oxygen_mg_L",
];

/// One row of a recorder CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub date: NaiveDate,
    pub water_level_m: f64,
    pub temperature_c: f64,
    pub rainfall_mm: f64,
    pub ph: f64,
    pub dissolved_oxygen_mg_l: f64,
}

impl Reading {
    /// Parse a recorder CSV export into Readings.
    ///
    /// The header must name `READING_COLUMNS` in order (case and surrounding
    /// whitespace are ignored). Rows that do not parse are skipped and logged.
    pub fn parse_readings_csv(csv_object: &str) -> Result<Vec<Reading>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        check_headers(rdr.headers()?)?;

        let mut readings = Vec::new();
        let mut skipped = 0u32;
        for result in rdr.records() {
            let record = result?;
            match Reading::try_from(&record) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    warn!("Skipping reading: {e}");
                    skipped += 1;
                }
            }
        }
        info!("Parsed {} readings, skipped {}", readings.len(), skipped);
        Ok(readings)
    }
}

fn check_headers(headers: &StringRecord) -> Result<()> {
    let matches = headers.len() >= READING_COLUMNS.len()
        && READING_COLUMNS
            .iter()
            .zip(headers.iter())
            .all(|(expected, found)| found.trim().eq_ignore_ascii_case(expected));
    if matches {
        Ok(())
    } else {
        Err(DwlrError::InvalidFormat(format!(
            "expected columns {}, found {}",
            READING_COLUMNS.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )))
    }
}

impl TryFrom<&StringRecord> for Reading {
    type Error = DwlrError;

    fn try_from(value: &StringRecord) -> Result<Self> {
        let line = value.position().map_or(0, |p| p.line());
        let invalid = |reason: String| DwlrError::InvalidRecord { line, reason };
        let number = |index: usize| -> Result<f64> {
            let raw = value.get(index).unwrap_or("").trim();
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(invalid(format!("{} is not a number: {raw:?}", READING_COLUMNS[index]))),
            }
        };

        let date = parse_date_lenient(value.get(0).unwrap_or(""))
            .map_err(|e| DwlrError::DateParse(format!("line {line}: {e}")))?;
        let reading = Reading {
            date,
            water_level_m: number(1)?,
            temperature_c: number(2)?,
            rainfall_mm: number(3)?,
            ph: number(4)?,
            dissolved_oxygen_mg_l: number(5)?,
        };
        if reading.water_level_m < 0.0 {
            return Err(invalid(format!("negative water level {}", reading.water_level_m)));
        }
        Ok(reading)
    }
}

impl From<&Reading> for HistoricalPoint {
    fn from(reading: &Reading) -> Self {
        HistoricalPoint {
            date: reading.date,
            level: reading.water_level_m,
            temperature: reading.temperature_c,
            rainfall: reading.rainfall_mm.max(0.0),
            ph: reading.ph,
            dissolved_oxygen: reading.dissolved_oxygen_mg_l.max(0.0),
        }
    }
}
