//! Forecast command.

use crate::{
    output::{rng_from_seed, write_json},
    population::{build_population, select_station},
    PopulationArgs,
};
use chrono::Utc;
use dwlr_data::forecast::forecast_station;
use log::info;

pub fn run_forecast(
    args: &PopulationArgs,
    station_id: Option<&str>,
    days: u32,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let mut rng = rng_from_seed(args.seed);
    let mut stations = build_population(args, &mut rng)?;
    let station = select_station(&mut stations, station_id)?;
    let forecast = forecast_station(station, days, &mut rng, Utc::now())?;
    info!(
        "Forecast {} days for {} ({}, {})",
        days, station.station_id, station.district, station.state
    );
    write_json(&forecast, output)
}
