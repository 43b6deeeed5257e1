//! SOFI demonstration driver.
//!
//! Drives the SOFI engine over a JSON entity store: `init` seeds the store
//! with sample entities, `run` drains a JSON request feed through the
//! engine, exporting changed entities back and reporting one outcome per
//! request.
//!
//! ```bash
//! sofi init store.json
//! sofi run store.json requests.json --outcomes outcomes.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod entity;
mod init;
mod ops;
mod run;
mod store;

/// SOFI demonstration driver over a JSON entity store.
#[derive(Parser)]
#[command(name = "sofi")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new store document with sample entities
    Init(init::InitArgs),

    /// Execute SOFI operations from a request feed
    Run(run::RunArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sofi=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sofi=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Init(args) => init::cmd_init(args),
        Commands::Run(args) => run::cmd_run(args),
    }
}
