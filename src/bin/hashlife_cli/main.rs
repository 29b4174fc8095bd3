mod run;
mod stats;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use run::{run_simulation, RunArgs};
use stats::{run_stats, StatsArgs};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Repeatedly double the field with HashLife, advancing it by half of its new size each time
    Run(RunArgs),
    /// Compute pattern's population and nodes distribution
    Stats(StatsArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIParser::parse();

    match args.action {
        Action::Run(args) => run_simulation(args),
        Action::Stats(args) => run_stats(args),
    }
}
