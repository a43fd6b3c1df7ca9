//! Detour scoring and trip orchestration for the Roadside engine.
//!
//! The crate provides three layers:
//! - [`DetourScorer`] routes through each candidate in bounded concurrent
//!   batches and measures the time it adds over the direct route.
//! - [`ResultBoard`] holds the ranked results and progress for the current
//!   epoch, rejects writes from stale epochs and publishes a
//!   [`ScoringSnapshot`](roadside_core::ScoringSnapshot) after every change.
//! - [`DetourSession`] drives one destination selection end to end, from
//!   baseline route to sampled searches to scored detours.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use roadside_core::PointOfInterest;
//! use roadside_core::test_support::{ScriptedDirections, StaticPlaceSearch, straight_route};
//! use roadside_scorer::{DetourSession, SessionConfig};
//!
//! let origin = Coord { x: 0.0, y: 0.0 };
//! let destination = Coord { x: 0.2, y: 0.0 };
//! let diner = PointOfInterest::new("diner", "Roadside Diner", Coord { x: 0.1, y: 0.01 });
//! let session = DetourSession::new(
//!     StaticPlaceSearch::with_pois([diner]),
//!     ScriptedDirections::with_baseline(straight_route(origin, destination, 10, 1_200))
//!         .with_detour("diner", 1_290),
//!     SessionConfig::default(),
//! );
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
//! let summary = runtime.block_on(session.plan(origin, destination))?;
//! assert_eq!(summary.pass.scored, 1);
//! let ranked = session.snapshot().results;
//! assert_eq!(ranked.first().map(|r| r.added_time_secs), Some(90));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod board;
mod discovery;
mod error;
mod scorer;
mod session;

pub use board::ResultBoard;
pub use discovery::discover;
pub use error::PlanError;
pub use scorer::{DEFAULT_BATCH_SIZE, DetourScorer, PassSummary, ScorerConfig, ScoringPass};
pub use session::{DetourSession, PlanSummary, SessionConfig};
