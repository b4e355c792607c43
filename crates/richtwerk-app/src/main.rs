// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Richtwerk — document rectification ahead of OCR.
//
// Entry point. Initialises logging, assembles the configuration, opens the
// rectifier once, and processes every input file.

mod cli;
mod data_dir;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use richtwerk_core::error::Result;
use richtwerk_core::human_errors::{HumanError, humanize_error};
use richtwerk_core::{RectifierConfig, RichtwerkError};
use richtwerk_document::Rectifier;

use cli::Args;
use data_dir::Locations;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.print_default_config {
        return match serde_json::to_string_pretty(&RectifierConfig::default()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                report(None, &e.into());
                ExitCode::FAILURE
            }
        };
    }

    tracing::info!("Richtwerk starting");
    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            tracing::warn!(failures, "Some inputs could not be rectified");
            ExitCode::FAILURE
        }
        Err(e) => {
            report(None, &e);
            ExitCode::FAILURE
        }
    }
}

/// Process every input; returns how many failed.
fn run(args: &Args) -> Result<usize> {
    let config = cli::build_config(args, &Locations::from_env())?;
    let rectifier = Rectifier::new(config)?;
    std::fs::create_dir_all(&args.output_dir)?;

    let mut failures = 0;
    for input in &args.inputs {
        match cli::rectify_file(&rectifier, input, &args.output_dir) {
            Ok((output, outcome)) => {
                println!("{} -> {} ({outcome})", input.display(), output.display());
            }
            Err(e) => {
                failures += 1;
                report(Some(input), &e);
            }
        }
    }

    rectifier.close();
    Ok(failures)
}

fn report(input: Option<&Path>, err: &RichtwerkError) {
    let human = humanize_error(err);
    tracing::error!(error = %err, severity = ?human.severity, "Operation failed");
    eprintln!("{}", explain(input, &human));
}

fn explain(input: Option<&Path>, human: &HumanError) -> String {
    let mut text = match input {
        Some(path) => format!("{}: {}", path.display(), human.message),
        None => format!("error: {}", human.message),
    };
    text.push_str(&format!("\n  {}", human.suggestion));
    if human.original_kept {
        text.push_str("\n  Original image kept.");
    }
    text
}
