// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanfeed — ingest new scanner captures and export them as pages or a PDF.
//
// Entry point. Initialises logging, parses arguments, and runs one
// ingest/export pass.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use services::config_dir::default_config_path;
use services::run::{RunOptions, run};

/// Export captures newer than the last run to images or a PDF.
#[derive(Debug, Parser)]
#[command(name = "scanfeed", version, about)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the stored last processed index for this run.
    #[arg(short, long, allow_negative_numbers = true)]
    watermark: Option<i64>,

    /// List new captures without exporting or updating the config.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            config_path: self.config.unwrap_or_else(default_config_path),
            watermark: self.watermark,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = Cli::parse().into_options();
    tracing::info!(config = %options.config_path.display(), "Scanfeed starting");

    match run(&options) {
        Ok(summary) => {
            tracing::info!(
                ingested = summary.ingested,
                written = summary.written.len(),
                watermark = summary.watermark,
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
