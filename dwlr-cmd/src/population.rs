//! Building a synthesized population and the commands that only read it.

use crate::{
    output::{rng_from_seed, write_json},
    PopulationArgs,
};
use anyhow::Context;
use chrono::Utc;
use dwlr_core::{
    error::DwlrError,
    location::Location,
    station::{Station, StationFilter},
};
use dwlr_data::{
    analytics::summarize,
    synthesizer::{StationSynthesizer, SynthesisConfig},
};
use log::info;
use rand::Rng;

/// The catalog from `path`, or the built-in catalog.
pub fn load_catalog<R: Rng + ?Sized>(path: Option<&str>, rng: &mut R) -> anyhow::Result<Vec<Location>> {
    match path {
        Some(path) => {
            let csv = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read location catalog {path}"))?;
            Location::parse_location_csv(&csv, rng)
                .with_context(|| format!("Failed to parse location catalog {path}"))
        }
        None => Location::default_catalog().context("Failed to parse built-in location catalog"),
    }
}

/// Synthesize the population described by `args` with a caller-supplied generator.
pub fn build_population<R: Rng + ?Sized>(
    args: &PopulationArgs,
    rng: &mut R,
) -> anyhow::Result<Vec<Station>> {
    let catalog = load_catalog(args.locations.as_deref(), rng)?;
    let config = SynthesisConfig::default().with_station_count(args.count);
    let synthesizer = StationSynthesizer::new(config, catalog)?;
    let stations = synthesizer.synthesize(rng, Utc::now())?;
    Ok(stations)
}

/// Find `station_id` in `stations`, or take the first station.
pub fn select_station<'a>(
    stations: &'a mut [Station],
    station_id: Option<&str>,
) -> anyhow::Result<&'a mut Station> {
    match station_id {
        Some(id) => Ok(stations
            .iter_mut()
            .find(|station| station.station_id == id)
            .ok_or_else(|| DwlrError::StationNotFound(id.to_string()))?),
        None => stations.first_mut().context("Population is empty"),
    }
}

pub fn run_synthesize(
    args: &PopulationArgs,
    filter: &StationFilter,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let mut rng = rng_from_seed(args.seed);
    let stations = build_population(args, &mut rng)?;
    let selected = filter.apply(&stations);
    info!(
        "Synthesized {} stations, {} match the filter",
        stations.len(),
        selected.len()
    );
    write_json(&selected, output)
}

pub fn run_summary(args: &PopulationArgs) -> anyhow::Result<()> {
    let mut rng = rng_from_seed(args.seed);
    let stations = build_population(args, &mut rng)?;
    write_json(&summarize(&stations), None)
}
