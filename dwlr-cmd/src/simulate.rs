//! Simulated real-time update command.

use crate::{
    output::{rng_from_seed, write_json},
    population::{build_population, select_station},
    PopulationArgs,
};
use chrono::{Duration, Utc};
use dwlr_data::simulation::{simulate_update, LevelUpdate};
use log::info;

/// Apply `updates` hourly readings to the selected station, oldest first.
pub fn simulate_updates(
    args: &PopulationArgs,
    station_id: Option<&str>,
    updates: u32,
) -> anyhow::Result<Vec<LevelUpdate>> {
    let mut rng = rng_from_seed(args.seed);
    let mut stations = build_population(args, &mut rng)?;
    let station = select_station(&mut stations, station_id)?;
    let start = Utc::now();
    let mut results = Vec::with_capacity(updates as usize);
    for hour in 0..updates {
        let at = start + Duration::hours(i64::from(hour));
        results.push(simulate_update(station, &mut rng, at));
    }
    info!(
        "Applied {} updates to {}, level now {} m",
        results.len(),
        station.station_id,
        station.current_level
    );
    Ok(results)
}

pub fn run_simulate(
    args: &PopulationArgs,
    station_id: Option<&str>,
    updates: u32,
) -> anyhow::Result<()> {
    write_json(&simulate_updates(args, station_id, updates)?, None)
}
