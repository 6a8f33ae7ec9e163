#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the dashboard PDF parser.
//!
//! Takes exactly one argument, the PDF path, and prints a single JSON
//! object to stdout: the dashboard record on success, or
//! `{"error": "..."}` on failure. The exit status is 0 or 1 accordingly.
//! Logging goes to stderr, so stdout only ever carries that one object.
//!
//! The argument is always a path. There are no flags, so `--help`,
//! `--version` and `--` are counted like any other argument.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use project_dashboard::{FieldTable, parse_dashboard_pdf};
use project_dashboard_models::{ErrorRecord, OutputEnvelope};

/// Printed as the error whenever the argument list is not exactly one path.
const USAGE: &str = "Usage: parse_dashboard <pdf_path>";

#[derive(Parser)]
#[command(
    name = "parse_dashboard",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(allow_hyphen_values = true)]
    pdf_path: PathBuf,
}

fn main() -> ExitCode {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let Some(cli) = parse_args(std::env::args_os()) else {
        return emit(&ErrorRecord::new(USAGE).into());
    };

    let envelope = match parse_dashboard_pdf(&cli.pdf_path, FieldTable::builtin()) {
        Ok(record) => OutputEnvelope::from(record),
        Err(e) => {
            log::debug!("Failed to parse {}: {e}", cli.pdf_path.display());
            OutputEnvelope::from(ErrorRecord::new(e.to_string()))
        }
    };

    emit(&envelope)
}

/// Accepts exactly one argument after the program name.
fn parse_args(args: impl IntoIterator<Item = OsString>) -> Option<Cli> {
    let mut args = args.into_iter();
    let bin = args.next().unwrap_or_else(|| OsString::from("parse_dashboard"));
    let rest: Vec<OsString> = args.collect();

    let [path] = <[OsString; 1]>::try_from(rest)
        .inspect_err(|rest| log::debug!("Expected 1 argument, got {}", rest.len()))
        .ok()?;

    // Everything after `--` is positional, including a literal `--`.
    Cli::try_parse_from([bin, OsString::from("--"), path])
        .inspect_err(|e| log::debug!("Rejected argument: {e}"))
        .ok()
}

/// Prints `envelope` as one line of JSON and maps it to an exit status.
fn emit(envelope: &OutputEnvelope) -> ExitCode {
    match serde_json::to_string(envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize output: {e}");
            return ExitCode::FAILURE;
        }
    }

    if envelope.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
