// crates/shipstats-cli/src/main.rs

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::export::handle_export;
use commands::report::handle_report;

/// A CLI for the shipment analytics pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Prints KPI, OTP, and aggregate summaries for a shipment spreadsheet.
    Report {
        /// Path to the .xlsx or .csv shipment export
        file: PathBuf,
        /// Emit the summaries as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Writes the normalized table to a date-stamped CSV file.
    Export {
        /// Path to the .xlsx or .csv shipment export
        file: PathBuf,
        /// Directory the CSV is written into (defaults to the current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { file, json } => handle_report(&file, json),
        Commands::Export { file, out_dir } => handle_export(&file, out_dir.as_deref()),
    }
}
