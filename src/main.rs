// src/main.rs

use anyhow::Result;
use clap::Parser;
use defscan::cli::Cli;
use defscan::config::{OutputDestination, ScannerBuilder};
use defscan::errors::Error;
use defscan::run;
use defscan::signal::setup_signal_handler;

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "defscan=debug".parse()?
                } else {
                    "defscan=info".parse()?
                },
            ),
        )
        .init();

    log::info!("Starting defscan v{}...", env!("CARGO_PKG_VERSION"));
    log::debug!("Raw arguments: {:?}", std::env::args().collect::<Vec<_>>());

    // --- Setup ---
    let cli = Cli::parse();
    let format = cli.format;
    let destination = match &cli.output_file {
        Some(path) => OutputDestination::File(path.clone()),
        None => OutputDestination::Stdout,
    };

    // --- Configuration & Execution ---
    let scanner = match ScannerBuilder::from_cli(cli).and_then(ScannerBuilder::build) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Scanner built successfully.");

    let token = setup_signal_handler()?;

    // --- Error Handling ---
    match run(&scanner, format, &destination, &token) {
        Ok(issues) => {
            for issue in &issues {
                eprintln!("warning: {}", issue);
            }
            Ok(())
        }
        Err(Error::Interrupted) => {
            eprintln!("\nOperation cancelled.");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
