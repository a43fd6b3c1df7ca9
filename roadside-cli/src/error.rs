//! Error types emitted by the Roadside CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use roadside_core::{ConfigError, GeoError, PriceLevelError};
use roadside_data::ProviderBuildError;
use roadside_scorer::PlanError;
use thiserror::Error;

/// Errors emitted by the Roadside CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable name.
        env: &'static str,
    },
    /// A coordinate was not written as `lat,lng`.
    #[error("{field} must be written as lat,lng, got {value:?}")]
    MalformedCoordinate {
        /// Flag name.
        field: &'static str,
        /// Rejected input.
        value: String,
    },
    /// A coordinate parsed but lies outside the valid range.
    #[error("{field} is not a valid location: {source}")]
    InvalidLocation {
        /// Flag name.
        field: &'static str,
        /// Validation failure.
        #[source]
        source: GeoError,
    },
    /// A corridor or scoring setting is out of range.
    #[error("invalid setting: {0}")]
    InvalidSetting(#[from] ConfigError),
    /// A price bound is outside `0..=4`.
    #[error("invalid {field}: {source}")]
    InvalidPrice {
        /// Flag name.
        field: &'static str,
        /// Validation failure.
        #[source]
        source: PriceLevelError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Constructing an HTTP provider failed.
    #[error("failed to build provider for {base_url:?}: {source}")]
    BuildProvider {
        /// Configured base URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Planning the trip failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// Serializing the report failed.
    #[error("failed to serialize plan report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write plan report: {0}")]
    WriteReport(#[source] std::io::Error),
}
