//! Core domain types and algorithms for the Roadside detour engine.
//!
//! The crate turns a route polyline plus the places discovered near it into
//! a short, evenly spread list of candidates, and defines the provider
//! traits the engine uses to search for places and fetch routes. Everything
//! here is synchronous and deterministic apart from the async provider
//! seams.

pub mod aggregate;
pub mod binning;
pub mod corridor;
pub mod cuisine;
pub mod detour;
pub mod directions;
pub mod geometry;
pub mod poi;
pub mod polyline;
pub mod progress;
pub mod route;
pub mod sampler;
pub mod search;
pub mod view;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use aggregate::CandidateAggregator;
pub use binning::{DetourCandidate, select_candidates};
pub use corridor::{ConfigError, CorridorConfig, CorridorWidth, KM_PER_MILE, filter_to_corridor};
pub use cuisine::Cuisine;
pub use detour::{DetourResult, ResultSet, rank_order};
pub use directions::{DirectionsProvider, RoutePlan, RouteRequest, RoutingError};
pub use geometry::{GeoError, RouteProjection, validate_location};
pub use poi::{PointOfInterest, PriceLevel, PriceLevelError};
pub use self::polyline::{Polyline, PolylineError};
pub use progress::ScoringProgress;
pub use route::{RouteGeometry, RouteLeg, RouteStep};
pub use sampler::{SamplingError, sample_route};
pub use search::{
    NearbySearch, PlaceSearchProvider, SearchConfig, SearchError, SearchPage, SearchRange,
};
pub use view::{CuisineCount, ResultFilters, ResultView};

/// Monotonic counter identifying one planning pass.
///
/// Work tagged with an older epoch than the current one is stale and must
/// be discarded.
pub type Epoch = u64;

/// Published after every change to the ranked results or progress.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ScoringSnapshot {
    /// Pass the snapshot belongs to.
    pub epoch: Epoch,
    /// Results in ranking order.
    pub results: Vec<DetourResult>,
    /// Progress of the pass.
    pub progress: ScoringProgress,
}
