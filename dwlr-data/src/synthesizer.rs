//! Synthetic DWLR station populations for running without a live backend.

use crate::{
    sampler::{status_sampler, trend_sampler, Categorical},
    series::{generate_history, HISTORY_DAYS},
};
use chrono::{DateTime, Utc};
use dwlr_core::{
    error::{DwlrError, Result},
    location::Location,
    station::{Station, StationStatus},
    trend::Trend,
};
use dwlr_utils::numeric::round_to;
use log::{debug, info};
use once_cell::sync::OnceCell;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default number of stations in a synthesized population.
pub const DEFAULT_STATION_COUNT: usize = 100;

/// Default coordinate jitter, in degrees, applied to each catalog location.
pub const DEFAULT_JITTER_DEGREES: f64 = 0.05;

/// Prefix shared by all recorder identifiers.
pub const ID_PREFIX: &str = "DWLR";

const ID_SUFFIX_LEN: usize = 4;
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Kinds of site a recorder is installed at, used to name stations.
pub const STATION_TYPES: [&str; 10] = [
    "Central Monitoring Station",
    "Bus Terminal Monitor",
    "Shopping Mall Station",
    "Temple Complex Well",
    "Railway Station Well",
    "Market District Monitor",
    "Housing Society Monitor",
    "Park Area Monitor",
    "Agricultural Borewell",
    "Village Handpump Recorder",
];

static POPULATION: OnceCell<Vec<Station>> = OnceCell::new();

/// Population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub station_count: usize,
    /// Days of history per station
    pub history_days: usize,
    /// Maximum offset, in degrees, applied to each coordinate
    pub jitter_degrees: f64,
    /// Initial current levels are drawn uniformly from this range, in meters
    pub min_level: f64,
    pub max_level: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            station_count: DEFAULT_STATION_COUNT,
            history_days: HISTORY_DAYS,
            jitter_degrees: DEFAULT_JITTER_DEGREES,
            min_level: 5.0,
            max_level: 50.0,
        }
    }
}

impl SynthesisConfig {
    pub fn with_station_count(mut self, station_count: usize) -> Self {
        self.station_count = station_count;
        self
    }

    pub fn with_history_days(mut self, history_days: usize) -> Self {
        self.history_days = history_days;
        self
    }

    pub fn with_jitter_degrees(mut self, jitter_degrees: f64) -> Self {
        self.jitter_degrees = jitter_degrees;
        self
    }

    pub fn with_level_range(mut self, min_level: f64, max_level: f64) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.station_count == 0 {
            return Err(DwlrError::InvalidStationCount(self.station_count));
        }
        if self.history_days == 0 {
            return Err(DwlrError::InvalidHistoryLength(self.history_days));
        }
        if !(self.min_level.is_finite()
            && self.max_level.is_finite()
            && 0.0 <= self.min_level
            && self.min_level <= self.max_level)
        {
            return Err(DwlrError::InvalidCurrentLevel(self.min_level));
        }
        Ok(())
    }
}

/// Recorder identifier: prefix, sequence number, random alphanumeric suffix.
///
/// The sequence number alone keeps identifiers unique within a population.
pub fn station_id<R: Rng + ?Sized>(sequence: usize, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{ID_PREFIX}{sequence:04}{suffix}")
}

/// Descriptive station name from the station-type catalog and a sequence number.
pub fn station_name<R: Rng + ?Sized>(sequence: usize, rng: &mut R) -> String {
    let kind = STATION_TYPES[rng.gen_range(0..STATION_TYPES.len())];
    format!("{kind} {sequence}")
}

/// Offset `location` by an independent uniform draw in `[-degrees, degrees]`
/// on each axis.
pub fn jitter<R: Rng + ?Sized>(location: &Location, degrees: f64, rng: &mut R) -> (f64, f64) {
    if degrees <= 0.0 {
        return (location.latitude, location.longitude);
    }
    (
        location.latitude + rng.gen_range(-degrees..=degrees),
        location.longitude + rng.gen_range(-degrees..=degrees),
    )
}

/// Builds station populations from a location catalog.
#[derive(Debug, Clone)]
pub struct StationSynthesizer {
    config: SynthesisConfig,
    catalog: Vec<Location>,
    trends: Categorical<Trend>,
    statuses: Categorical<StationStatus>,
}

impl StationSynthesizer {
    /// Fails fast on an empty catalog or an invalid configuration.
    pub fn new(config: SynthesisConfig, catalog: Vec<Location>) -> Result<Self> {
        if catalog.is_empty() {
            return Err(DwlrError::EmptyCatalog);
        }
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            trends: trend_sampler()?,
            statuses: status_sampler()?,
        })
    }

    /// Synthesize `station_count` stations whose histories end on `now`'s date.
    ///
    /// Locations are taken from the catalog in order, cycling when the
    /// population is larger than the catalog.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Vec<Station>> {
        info!(
            "Synthesizing {} stations from {} locations",
            self.config.station_count,
            self.catalog.len()
        );
        let stations = (0..self.config.station_count)
            .map(|index| self.synthesize_station(index, rng, now))
            .collect::<Result<Vec<Station>>>()?;
        debug!("Synthesized {} stations", stations.len());
        Ok(stations)
    }

    /// Synthesize the station at position `index` of the population.
    pub fn synthesize_station<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Station> {
        let location = &self.catalog[index % self.catalog.len()];
        let (latitude, longitude) = jitter(location, self.config.jitter_degrees, rng);
        let trend = self.trends.sample(rng);
        let current_level = round_to(
            rng.gen_range(self.config.min_level..=self.config.max_level),
            2,
        );
        let status = self.statuses.sample(rng);
        let sequence = index + 1;
        let name = station_name(sequence, rng);
        let historical_data = generate_history(
            current_level,
            trend,
            now.date_naive(),
            self.config.history_days,
            rng,
        )?;
        let water_quality = historical_data
            .last()
            .map(|point| point.water_quality())
            .ok_or(DwlrError::EmptySeries)?;

        Ok(Station {
            station_id: station_id(sequence, rng),
            name,
            state: location.state.clone(),
            district: location.district.clone(),
            latitude,
            longitude,
            status,
            current_level,
            trend,
            last_updated: now,
            historical_data,
            water_quality,
        })
    }
}

/// The default population: synthesized from entropy and the embedded catalog
/// on first use, then shared for the rest of the process.
pub fn default_population() -> Result<&'static [Station]> {
    POPULATION
        .get_or_try_init(|| {
            let synthesizer =
                StationSynthesizer::new(SynthesisConfig::default(), Location::default_catalog()?)?;
            synthesizer.synthesize(&mut StdRng::from_entropy(), Utc::now())
        })
        .map(Vec::as_slice)
}
