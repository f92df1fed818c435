// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SIM reader command line.
//
// Entry point. Loads configuration, initialises logging on stderr, runs one
// channel call, and prints the JSON report on stdout.

mod cli;
mod report;
mod services;

use std::process::ExitCode;

use clap::Parser;
use simreader_bridge::snapshot::TelephonySnapshot;
use simreader_core::ReaderConfig;
use simreader_core::error::{ErrorCode, Result, SimReaderError};
use simreader_core::human_errors::humanize_error;
use simreader_plugin::OperationError;

use cli::{Cli, Command};
use report::Report;
use services::reader_services::{ReaderServices, resolve_config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli.options) {
        Ok(config) => config,
        Err(e) => return failure(None, &e),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::debug!(command = ?cli.command, "sim-reader starting");

    match run(&cli.command, &config) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(err)) => failure(Some(err.code), &err.source),
        Err(e) => failure(None, &e),
    }
}

/// Run one command. A failed channel call is returned, not raised, so the
/// report is still printed.
fn run(command: &Command, config: &ReaderConfig) -> Result<Option<OperationError>> {
    let Some(call) = command.method_call()? else {
        println!(
            "{}",
            serde_json::to_string_pretty(&TelephonySnapshot::example())?
        );
        return Ok(None);
    };

    let services = ReaderServices::new(config)?;
    let outcome = services.invoke(&call);
    let report = Report::new(services.platform_name(), services.channel(), outcome.response);
    println!("{}", report.to_json(config.pretty_output)?);
    Ok(outcome.error)
}

fn failure(code: Option<ErrorCode>, err: &SimReaderError) -> ExitCode {
    tracing::error!(error = %err, "sim-reader failed");
    let human = humanize_error(err);
    match code {
        Some(code) => eprintln!("error [{code}]: {}", human.message),
        None => eprintln!("error: {}", human.message),
    }
    eprintln!("  {}", human.suggestion);
    ExitCode::FAILURE
}
