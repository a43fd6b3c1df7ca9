//! Facade crate for the Roadside detour engine.
//!
//! This crate re-exports the core domain types and the scoring session, and
//! exposes the HTTP collaborator adapters behind the `http` feature.

#![forbid(unsafe_code)]

pub use roadside_core::{
    CorridorConfig, CorridorWidth, Cuisine, DetourResult, DirectionsProvider, Epoch, GeoError,
    PlaceSearchProvider, PointOfInterest, Polyline, PriceLevel, ResultFilters, ResultView,
    RouteGeometry, RoutingError, ScoringProgress, ScoringSnapshot, SearchConfig, SearchError,
};
pub use roadside_scorer::{
    DetourScorer, DetourSession, PassSummary, PlanError, PlanSummary, ResultBoard, ScorerConfig,
    SessionConfig,
};

#[cfg(feature = "http")]
pub use roadside_data::{
    HttpDirectionsProvider, HttpPlaceSearchProvider, HttpProviderConfig, ProviderBuildError,
};

#[cfg(feature = "test-support")]
pub use roadside_core::test_support;
