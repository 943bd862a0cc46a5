// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # handover CLI
//!
//! The `handover` binary transfers ownership of one Google Drive file.
//!
//! ## Inputs
//!
//! Read from the environment, optionally seeded from a `.env` file in the
//! working directory:
//!
//! - `FILE_ID` - Drive file identifier
//! - `CURRENT_OWNER_EMAIL` - account that owns the file today
//! - `NEW_OWNER_EMAIL` - account that should own it afterwards
//!
//! The service-account key is read from `./credentials.json` unless
//! `GOOGLE_APPLICATION_CREDENTIALS` points elsewhere.
//!
//! ## Exit codes
//!
//! `0` on success, `1` on any failure.

use anyhow::{Context, Result};
use clap::Parser;
use handover_core::domain::config::TransferConfig;

use handover_cli::commands;

/// Verify access to a Drive file and hand its ownership over
#[derive(Parser)]
#[command(name = "handover")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HANDOVER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        fail(&e);
    }

    // A missing .env file is fine; the variables may come from the shell
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            fail(&anyhow::Error::new(e).context("Failed to load .env file"));
        }
    }

    // Configuration is resolved before any credential or network access
    let config = match TransferConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&e.into()),
    };

    if let Err(e) = commands::transfer::run(&config).await {
        fail(&e);
    }
}

fn fail(err: &anyhow::Error) -> ! {
    // Nothing left to report to if stderr itself is gone
    let _ = commands::report_error(&mut std::io::stderr(), err);
    std::process::exit(1);
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
