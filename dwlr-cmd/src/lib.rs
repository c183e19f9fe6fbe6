//! Command implementations for the DWLR CLI.
//!
//! Provides subcommands for synthesizing station populations, forecasting
//! levels, summarizing a network, aggregating recorder exports and
//! simulating live readings. Every command prints JSON.

use clap::{Args, Subcommand};
use dwlr_core::{
    station::{StationFilter, StationStatus},
    trend::Trend,
};
use dwlr_data::{forecast::DEFAULT_HORIZON_DAYS, synthesizer::DEFAULT_STATION_COUNT};

pub mod aggregate;
pub mod forecast;
pub mod output;
pub mod population;
pub mod simulate;

/// Options shared by every command that works on a synthesized population.
#[derive(Args, Debug, Clone)]
pub struct PopulationArgs {
    /// Number of stations to synthesize
    #[arg(short = 'n', long, default_value_t = DEFAULT_STATION_COUNT)]
    pub count: usize,

    /// Seed for reproducible output; random when omitted
    #[arg(short, long, env = "DWLR_SEED")]
    pub seed: Option<u64>,

    /// Location catalog CSV (state,district,latitude,longitude); the built-in catalog when omitted
    #[arg(short, long)]
    pub locations: Option<String>,
}

/// Station selection for listings.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep stations whose state contains this text (case-insensitive)
    #[arg(long)]
    pub state: Option<String>,

    /// Keep stations whose district contains this text (case-insensitive)
    #[arg(long)]
    pub district: Option<String>,

    /// Keep stations with this status (active, inactive, maintenance)
    #[arg(long)]
    pub status: Option<StationStatus>,

    /// Keep stations with this trend (rising, falling, stable)
    #[arg(long)]
    pub trend: Option<Trend>,
}

impl From<FilterArgs> for StationFilter {
    fn from(args: FilterArgs) -> Self {
        StationFilter {
            state: args.state,
            district: args.district,
            status: args.status,
            trend: args.trend,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Synthesize a station population with 90-day histories
    Synthesize {
        #[command(flatten)]
        population: PopulationArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output path for the stations JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Forecast water levels for one station of a synthesized population
    Forecast {
        #[command(flatten)]
        population: PopulationArgs,

        /// Station to forecast (the first station when omitted)
        #[arg(long)]
        station_id: Option<String>,

        /// Forecast horizon in days
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_HORIZON_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=90)
        )]
        days: u32,

        /// Output path for the forecast JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize trends and per-state levels of a synthesized population
    Summary {
        #[command(flatten)]
        population: PopulationArgs,
    },

    /// Build stations from a recorder CSV export
    Aggregate {
        /// Recorder CSV (Date,Water_Level_m,Temperature_C,Rainfall_mm,pH,Dissolved_Oxygen_mg_L)
        #[arg(short, long)]
        readings: String,

        /// Maximum number of stations to split the readings into
        #[arg(long, default_value_t = dwlr_data::aggregation::DEFAULT_AGGREGATED_STATIONS)]
        stations: usize,

        #[arg(short, long, env = "DWLR_SEED")]
        seed: Option<u64>,

        /// Location catalog CSV; the built-in catalog when omitted
        #[arg(short, long)]
        locations: Option<String>,

        /// Output path for the stations JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Apply simulated real-time readings to a station
    Simulate {
        #[command(flatten)]
        population: PopulationArgs,

        /// Station to update (the first station when omitted)
        #[arg(long)]
        station_id: Option<String>,

        /// Number of hourly readings to simulate
        #[arg(short, long, default_value_t = 1)]
        updates: u32,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Synthesize {
            population,
            filter,
            output,
        } => population::run_synthesize(&population, &filter.into(), output.as_deref()),
        Command::Forecast {
            population,
            station_id,
            days,
            output,
        } => forecast::run_forecast(&population, station_id.as_deref(), days, output.as_deref()),
        Command::Summary { population } => population::run_summary(&population),
        Command::Aggregate {
            readings,
            stations,
            seed,
            locations,
            output,
        } => aggregate::run_aggregate(
            &readings,
            stations,
            seed,
            locations.as_deref(),
            output.as_deref(),
        ),
        Command::Simulate {
            population,
            station_id,
            updates,
        } => simulate::run_simulate(&population, station_id.as_deref(), updates),
    }
}
