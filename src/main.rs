use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "LWE attack cost estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Trace search walks and batch scheduling.
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate attack costs for one parameter set.
    Estimate(cmd::estimate::EstimateArgs),
    /// Estimate attack costs for every row of a CSV parameter file.
    Batch(cmd::batch::BatchArgs),
    /// List the built-in parameter sets.
    Schemes,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Estimate(args) => cmd::estimate::run(args),
        Commands::Batch(args) => cmd::batch::run(args),
        Commands::Schemes => {
            reports::print_schemes();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
