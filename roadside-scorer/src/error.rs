//! Error types raised while planning a trip.
#![forbid(unsafe_code)]

use roadside_core::{ConfigError, GeoError, PolylineError, RoutingError, SamplingError};
use thiserror::Error;

/// Errors that abort a planning operation.
///
/// Upstream failures for individual sample points or candidates are logged
/// and skipped rather than reported here.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The origin or destination is not a valid coordinate.
    #[error("invalid trip location")]
    InvalidLocation(#[from] GeoError),
    /// The corridor, search or scoring configuration is unusable.
    #[error("invalid configuration")]
    InvalidConfig(#[from] ConfigError),
    /// The baseline route could not be sampled.
    #[error("failed to sample the baseline route")]
    Sampling(#[from] SamplingError),
    /// The direct route could not be fetched; without it there is no
    /// added-time metric.
    #[error("failed to fetch the baseline route")]
    Baseline(#[source] RoutingError),
    /// The direct route's shape is too short to describe a trip.
    #[error("baseline route shape is unusable")]
    UnusableBaseline(#[source] PolylineError),
    /// The operation needs a planned trip and none is active.
    #[error("no trip has been planned")]
    NoActiveTrip,
}
