//! DLCGate CLI - store coordinator command-line interface.
//!
//! Thin binary over the `dlcgate` library: parses arguments, initializes
//! logging and dispatches to a command module.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod error;

#[derive(Debug, Parser)]
#[command(name = "dlcgate", version, about = "Entitlement and download coordinator")]
struct Cli {
    /// Path to the configuration file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to a daily-rolled file in this directory instead of stderr
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the asset catalog
    Catalog {
        /// Also list the purchase ledger
        #[arg(long)]
        purchases: bool,
    },
    /// Show display prices for the configured SKUs
    Prices,
    /// Purchase a SKU and download the granted asset
    Buy {
        /// SKU to purchase
        sku: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Download every entitled asset that is not yet installed
    Sync,
    /// Print the local path a resource key maps to
    Resolve {
        /// Logical key (the asset's filename)
        key: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // The appender guard must outlive all logging.
    let _guard = match &cli.log_dir {
        Some(dir) => dlcgate::telemetry::init_with_file(dir, filter),
        None => {
            dlcgate::telemetry::init(filter);
            None
        }
    };

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Catalog { purchases } => commands::catalog::run(config, purchases).await,
        Commands::Prices => commands::prices::run(config).await,
        Commands::Buy { sku, yes } => commands::buy::run(config, &sku, yes).await,
        Commands::Sync => commands::sync::run(config).await,
        Commands::Resolve { key } => commands::resolve::run(config, &key).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
