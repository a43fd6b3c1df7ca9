//! Command-line interface for planning restaurant detours along a drive.
//!
//! The `plan` command fetches the direct route between two points, searches
//! for restaurants along it, scores a detour through each candidate and
//! prints the ranked, filtered results as JSON. Settings layer from CLI
//! flags over `ROADSIDE_*` environment variables over a configuration file.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

const ARG_ORIGIN: &str = "origin";
const ARG_DESTINATION: &str = "destination";
const ARG_CORRIDOR_MILES: &str = "corridor-miles";
const ARG_SAMPLE_SPACING_KM: &str = "sample-spacing-km";
const ARG_MAX_CANDIDATES: &str = "max-candidates";
const ARG_BATCH_SIZE: &str = "batch-size";
const ARG_RADIUS_M: &str = "radius-m";
const ARG_KEYWORD: &str = "keyword";
const ARG_MIN_PRICE: &str = "min-price";
const ARG_MAX_PRICE: &str = "max-price";
const ARG_BASE_URL: &str = "base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_LOAD_MORE: &str = "load-more";
const ENV_ORIGIN: &str = "ROADSIDE_ORIGIN";
const ENV_DESTINATION: &str = "ROADSIDE_DESTINATION";

/// Run the Roadside CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(*args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roadside",
    about = "Find restaurants that cost the least time to visit on a drive",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a trip and rank detours through restaurants along it.
    Plan(Box<plan::PlanArgs>),
}

#[cfg(test)]
mod tests;
