//! CLI entry point: run one simulated trading session over a directory of
//! input CSVs and write the three reports.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Single-venue equities exchange simulator.
#[derive(Debug, Parser)]
#[command(name = "exchange-sim", version, about)]
struct Args {
    /// Directory holding input_clients.csv, input_instruments.csv and
    /// input_orders.csv.
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,

    /// Directory the three report files are written into.
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match exchange_sim::run(&args.input_dir, &args.output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("session aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
