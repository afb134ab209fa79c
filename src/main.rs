//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `safespace` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use safespace::initialization::init_logger_with;
use safespace::{serve, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists) so deployment
    // settings like SAFESPACE_PORT don't have to be exported manually.
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    if let Err(e) = serve(&config).await {
        eprintln!("safespace error: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
