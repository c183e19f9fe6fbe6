use crate::error::{DwlrError, Result};
use csv::ReaderBuilder;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Embedded catalog of recorder sites used when no catalog file is supplied.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/locations.csv");

/// Approximate centroids for states whose districts are commonly given
/// without coordinates.
const STATE_CENTROIDS: [(&str, f64, f64); 9] = [
    ("rajasthan", 26.9124, 75.7873),
    ("andhra pradesh", 14.7504, 78.5705),
    ("karnataka", 15.3173, 75.7139),
    ("bihar", 25.0961, 85.3131),
    ("madhya pradesh", 23.4734, 77.9474),
    ("chhattisgarh", 21.2787, 81.8661),
    ("himachal pradesh", 31.1048, 77.1734),
    ("meghalaya", 25.4670, 91.3662),
    ("sikkim", 27.5330, 88.5122),
];

/// Geographic centre of India, used for states without a known centroid.
pub const INDIA_CENTROID: (f64, f64) = (20.5937, 78.9629);

/// Spread applied around a state centroid so districts do not stack.
pub const CENTROID_JITTER_DEGREES: f64 = 0.5;

/// A named place stations can be sited at.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub district: String,
    /// Decimal degrees
    pub latitude: f64,
    /// Decimal degrees
    pub longitude: f64,
}

/// Centroid for `state` (case-insensitive), or the centre of India.
pub fn state_centroid(state: &str) -> (f64, f64) {
    let key = state.trim().to_lowercase();
    STATE_CENTROIDS
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, lat, lon)| (*lat, *lon))
        .unwrap_or(INDIA_CENTROID)
}

/// A point near the centroid of `state`, offset by up to ±0.5° on each axis.
pub fn fallback_coordinates<R: Rng + ?Sized>(state: &str, rng: &mut R) -> (f64, f64) {
    let (lat, lon) = state_centroid(state);
    (
        lat + rng.gen_range(-CENTROID_JITTER_DEGREES..=CENTROID_JITTER_DEGREES),
        lon + rng.gen_range(-CENTROID_JITTER_DEGREES..=CENTROID_JITTER_DEGREES),
    )
}

fn parse_coordinate(field: Option<&str>) -> Option<f64> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl Location {
    /// The embedded default catalog.
    pub fn default_catalog() -> Result<Vec<Location>> {
        Location::parse_location_csv(CSV_OBJECT, &mut rand::thread_rng())
    }

    /// Parse a CSV string of locations into a vector of Locations.
    ///
    /// Expected CSV columns: state, district, latitude, longitude.
    /// Rows with a blank or unparsable coordinate are placed near their
    /// state's centroid instead.
    pub fn parse_location_csv<R: Rng + ?Sized>(
        csv_object: &str,
        rng: &mut R,
    ) -> Result<Vec<Location>> {
        let mut location_list: Vec<Location> = Vec::new();
        let mut fallbacks = 0usize;
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let line = record.position().map_or(0, |p| p.line());
            let state = record.get(0).unwrap_or("").trim();
            let district = record.get(1).unwrap_or("").trim();
            if state.is_empty() || district.is_empty() {
                return Err(DwlrError::InvalidRecord {
                    line,
                    reason: "state and district are required".to_string(),
                });
            }
            let (latitude, longitude) =
                match (parse_coordinate(record.get(2)), parse_coordinate(record.get(3))) {
                    (Some(lat), Some(lon)) => (lat, lon),
                    _ => {
                        fallbacks += 1;
                        debug!("No coordinates for {district}, {state}; using state centroid");
                        fallback_coordinates(state, rng)
                    }
                };
            location_list.push(Location {
                state: state.to_string(),
                district: district.to_string(),
                latitude,
                longitude,
            });
        }
        info!(
            "Loaded {} locations ({} placed by state centroid)",
            location_list.len(),
            fallbacks
        );
        Ok(location_list)
    }
}
