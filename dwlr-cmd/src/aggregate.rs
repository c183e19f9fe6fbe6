//! Recorder CSV aggregation command.

use crate::{
    output::{rng_from_seed, write_json},
    population::load_catalog,
};
use anyhow::Context;
use chrono::Utc;
use dwlr_core::{reading::Reading, station::Station};
use dwlr_data::aggregation::{aggregate_readings, AggregationConfig};
use log::info;

/// Read a recorder export and split it into at most `stations` stations.
pub fn aggregate_file(
    readings_csv: &str,
    stations: usize,
    seed: Option<u64>,
    locations: Option<&str>,
) -> anyhow::Result<Vec<Station>> {
    let csv = std::fs::read_to_string(readings_csv)
        .with_context(|| format!("Failed to read {readings_csv}"))?;
    let readings = Reading::parse_readings_csv(&csv)
        .with_context(|| format!("Failed to parse {readings_csv}"))?;
    info!("Loaded {} readings from {}", readings.len(), readings_csv);

    let mut rng = rng_from_seed(seed);
    let catalog = load_catalog(locations, &mut rng)?;
    let config = AggregationConfig::default().with_station_count(stations);
    let stations = aggregate_readings(&readings, &catalog, &config, &mut rng, Utc::now())?;
    Ok(stations)
}

pub fn run_aggregate(
    readings_csv: &str,
    stations: usize,
    seed: Option<u64>,
    locations: Option<&str>,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let stations = aggregate_file(readings_csv, stations, seed, locations)?;
    write_json(&stations, output)
}
