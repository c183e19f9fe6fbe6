//! DWLR CLI - Command line tool for synthetic groundwater station data.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "dwlr-cli",
    version,
    about = "Digital Water Level Recorder station toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: dwlr_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("dwlr-cli {}", env!("CARGO_PKG_VERSION"));
    dwlr_cmd::run(cli.command)
}
