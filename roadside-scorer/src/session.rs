//! One user's destination selection, end to end.
//!
//! [`DetourSession`] owns the trip state and the [`ResultBoard`]. Planning a
//! trip bumps the board's epoch, fetches the baseline, samples it, discovers
//! places one search at a time, narrows them to the corridor, picks the bin
//! winners and scores them. Changing the corridor width or sample spacing
//! re-plans the last trip under a fresh epoch, so anything still in flight
//! for the old one is discarded.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use geo::Coord;
use log::{debug, info};
use roadside_core::{
    CorridorConfig, CorridorWidth, DirectionsProvider, Epoch, PlaceSearchProvider, PointOfInterest,
    Polyline, ResultFilters, ResultView, RouteGeometry, ScoringSnapshot, SearchConfig,
    select_candidates, sample_route, validate_location,
};
use tokio::sync::watch;

use crate::board::ResultBoard;
use crate::discovery::discover;
use crate::error::PlanError;
use crate::scorer::{DetourScorer, PassSummary, ScorerConfig, ScoringPass};

/// Every tunable a session applies when planning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Corridor width, sample spacing and candidate cap.
    pub corridor: CorridorConfig,
    /// Query parameters for each sample point.
    pub search: SearchConfig,
    /// Scoring batch size.
    pub scorer: ScorerConfig,
}

impl SessionConfig {
    /// Replace the corridor settings.
    #[must_use]
    pub fn with_corridor(mut self, corridor: CorridorConfig) -> Self {
        self.corridor = corridor;
        self
    }

    /// Replace the search settings.
    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Replace the scorer settings.
    #[must_use]
    pub fn with_scorer(mut self, scorer: ScorerConfig) -> Self {
        self.scorer = scorer;
        self
    }

    /// Validate every section.
    ///
    /// # Errors
    /// Returns the first [`roadside_core::ConfigError`] found.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.corridor.validate()?;
        self.scorer.validate()?;
        Ok(())
    }
}

/// What a planning run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Epoch the run wrote under.
    pub epoch: Epoch,
    /// Duration of the direct route in seconds.
    pub baseline_secs: u64,
    /// Search sample points along the baseline.
    pub samples: usize,
    /// Distinct places discovered.
    pub discovered: usize,
    /// Places inside the corridor.
    pub in_corridor: usize,
    /// Candidates chosen for scoring.
    pub selected: usize,
    /// Scoring pass counts.
    pub pass: PassSummary,
}

#[derive(Debug, Clone, Copy)]
struct TripRequest {
    origin: Coord<f64>,
    destination: Coord<f64>,
}

#[derive(Debug)]
struct Trip {
    epoch: Epoch,
    request: TripRequest,
    baseline_secs: u64,
    polyline: Polyline,
    corridor: Vec<PointOfInterest>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Plans trips and keeps their ranked detours.
///
/// Methods take `&self`; a newer [`plan`](Self::plan) may start while an
/// older one is still awaiting upstream calls and the older one's late
/// results are dropped.
#[derive(Debug)]
pub struct DetourSession<S, D> {
    search: S,
    scorer: DetourScorer<D>,
    board: ResultBoard,
    config: Mutex<SessionConfig>,
    request: Mutex<Option<TripRequest>>,
    trip: Mutex<Option<Trip>>,
}

impl<S, D> DetourSession<S, D>
where
    S: PlaceSearchProvider,
    D: DirectionsProvider,
{
    /// Build a session over the two collaborator services.
    pub fn new(search: S, directions: D, config: SessionConfig) -> Self {
        Self {
            search,
            scorer: DetourScorer::new(directions),
            board: ResultBoard::new(),
            config: Mutex::new(config),
            request: Mutex::new(None),
            trip: Mutex::new(None),
        }
    }

    /// The settings the next plan will use.
    pub fn config(&self) -> SessionConfig {
        lock(&self.config).clone()
    }

    /// Plan a trip from `origin` to `destination` and score its detours.
    ///
    /// Results stream onto the board while this future runs. The returned
    /// summary's pass is marked cancelled when a newer plan superseded this
    /// one.
    ///
    /// # Errors
    /// Fails on invalid coordinates or configuration, or when the baseline
    /// route cannot be fetched or sampled. Failures of individual searches or
    /// detours are logged and skipped.
    pub async fn plan(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<PlanSummary, PlanError> {
        let request = TripRequest {
            origin: validate_location(origin)?,
            destination: validate_location(destination)?,
        };
        let config = self.config();
        config.validate()?;
        *lock(&self.request) = Some(request);
        self.run(request, &config).await
    }

    /// Change the corridor width and re-plan the current trip, if any.
    ///
    /// # Errors
    /// As for [`plan`](Self::plan).
    pub async fn set_corridor_width(
        &self,
        width: CorridorWidth,
    ) -> Result<Option<PlanSummary>, PlanError> {
        lock(&self.config).corridor.width = width;
        self.replan().await
    }

    /// Change the distance between search samples and re-plan.
    ///
    /// # Errors
    /// Rejects a non-positive or non-finite spacing without changing
    /// anything; otherwise as for [`plan`](Self::plan).
    pub async fn set_sample_spacing(&self, km: f64) -> Result<Option<PlanSummary>, PlanError> {
        {
            let mut config = lock(&self.config);
            config.corridor.with_sample_spacing_km(km).validate()?;
            config.corridor.sample_spacing_km = km;
        }
        self.replan().await
    }

    /// Score the next set of corridor places not yet in the results.
    ///
    /// Selection reuses the binning of the original pass over what is left,
    /// and new results join the existing ones under the same epoch.
    ///
    /// # Errors
    /// Returns [`PlanError::NoActiveTrip`] when nothing has been planned or
    /// the last plan was superseded before it finished discovering.
    pub async fn load_more(&self) -> Result<PassSummary, PlanError> {
        let config = self.config();
        let (pass, selected) = {
            let trip = lock(&self.trip);
            let Some(trip) = trip.as_ref().filter(|trip| self.board.is_current(trip.epoch)) else {
                return Err(PlanError::NoActiveTrip);
            };
            let remaining = unscored(&trip.corridor, &self.board.scored_ids());
            let selected =
                select_candidates(&remaining, &trip.polyline, config.corridor.max_candidates);
            (Self::pass_for(trip, &config), selected)
        };
        if selected.is_empty() {
            debug!("nothing left to score for epoch {}", pass.epoch);
            return Ok(PassSummary::default());
        }
        info!("loading {} more candidates", selected.len());
        Ok(self.scorer.score_pass(&self.board, &pass, &selected).await)
    }

    /// Corridor places discovered for the current trip but not yet scored.
    pub fn unscored_candidates(&self) -> Vec<PointOfInterest> {
        let trip = lock(&self.trip);
        trip.as_ref()
            .filter(|trip| self.board.is_current(trip.epoch))
            .map(|trip| unscored(&trip.corridor, &self.board.scored_ids()))
            .unwrap_or_default()
    }

    /// The latest ranked results and progress.
    pub fn snapshot(&self) -> ScoringSnapshot {
        self.board.snapshot()
    }

    /// Observe every change to the ranked results and progress.
    pub fn subscribe(&self) -> watch::Receiver<ScoringSnapshot> {
        self.board.subscribe()
    }

    /// Apply display filters to the current results.
    pub fn view(&self, filters: &ResultFilters) -> ResultView {
        ResultView::derive(&self.snapshot().results, filters)
    }

    /// The current trip's direct route, once fetched.
    pub fn baseline(&self) -> Option<RouteGeometry> {
        self.board.baseline()
    }

    async fn replan(&self) -> Result<Option<PlanSummary>, PlanError> {
        let Some(request) = *lock(&self.request) else {
            return Ok(None);
        };
        let config = self.config();
        config.validate()?;
        self.run(request, &config).await.map(Some)
    }

    async fn run(
        &self,
        request: TripRequest,
        config: &SessionConfig,
    ) -> Result<PlanSummary, PlanError> {
        let epoch = self.board.invalidate();
        info!(
            "planning epoch {epoch}: ({}, {}) to ({}, {})",
            request.origin.y, request.origin.x, request.destination.y, request.destination.x
        );

        let baseline = match self.scorer.baseline(request.origin, request.destination).await {
            Ok(route) => route,
            Err(err) => {
                self.board.abort(epoch);
                return Err(PlanError::Baseline(err));
            }
        };
        if let Err(err) = baseline.polyline.require_usable() {
            self.board.abort(epoch);
            return Err(PlanError::UnusableBaseline(err));
        }
        let baseline_secs = baseline.total_duration_secs();
        let polyline = baseline.polyline.clone();
        self.board.set_baseline(epoch, baseline);
        self.board.mark_discovering(epoch);

        let samples = match sample_route(&polyline, config.corridor.sample_spacing_km) {
            Ok(samples) => samples,
            Err(err) => {
                self.board.abort(epoch);
                return Err(err.into());
            }
        };
        let mut summary = PlanSummary {
            epoch,
            baseline_secs,
            samples: samples.len(),
            ..PlanSummary::default()
        };

        let Some(pool) = discover(&self.search, &config.search, &samples, &self.board, epoch).await
        else {
            summary.pass.cancelled = true;
            return Ok(summary);
        };
        summary.discovered = pool.len();
        let corridor = pool.into_corridor(&polyline, config.corridor.width);
        summary.in_corridor = corridor.len();
        let selected = select_candidates(&corridor, &polyline, config.corridor.max_candidates);
        summary.selected = selected.len();
        info!(
            "epoch {epoch}: {} samples, {} places, {} in corridor, {} selected",
            summary.samples, summary.discovered, summary.in_corridor, summary.selected
        );

        let trip = Trip {
            epoch,
            request,
            baseline_secs,
            polyline,
            corridor,
        };
        let pass = Self::pass_for(&trip, config);
        self.store_trip(trip);

        summary.pass = self.scorer.score_pass(&self.board, &pass, &selected).await;
        Ok(summary)
    }

    fn store_trip(&self, trip: Trip) {
        let mut slot = lock(&self.trip);
        let newer_stored = slot.as_ref().is_some_and(|stored| stored.epoch > trip.epoch);
        if !newer_stored && self.board.is_current(trip.epoch) {
            *slot = Some(trip);
        }
    }

    const fn pass_for(trip: &Trip, config: &SessionConfig) -> ScoringPass {
        ScoringPass {
            epoch: trip.epoch,
            origin: trip.request.origin,
            destination: trip.request.destination,
            baseline_secs: trip.baseline_secs,
            batch_size: config.scorer.batch_size,
        }
    }
}

fn unscored(corridor: &[PointOfInterest], scored: &HashSet<String>) -> Vec<PointOfInterest> {
    corridor
        .iter()
        .filter(|poi| !scored.contains(&poi.id))
        .cloned()
        .collect()
}
