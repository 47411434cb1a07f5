mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!(
        "🚀 StructureFold CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let quiet = cli.quiet;
    let command_result = match cli.command {
        Commands::SamToRtsc(args) => {
            info!("Dispatching to 'sam-to-rtsc' command.");
            commands::sam_to_rtsc::run(args, quiet)
        }
        Commands::RtscToReact(args) => {
            info!("Dispatching to 'rtsc-to-react' command.");
            commands::rtsc_to_react::run(args, quiet)
        }
        Commands::Combine(args) => {
            info!("Dispatching to 'combine' command.");
            commands::combine::run(args)
        }
        Commands::Coverage(args) => {
            info!("Dispatching to 'coverage' command.");
            commands::coverage::run(args)
        }
        Commands::Specificity(args) => {
            info!("Dispatching to 'specificity' command.");
            commands::specificity::run(args)
        }
        Commands::ReactStats(args) => {
            info!("Dispatching to 'react-stats' command.");
            commands::react_stats::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
