//! Detour scoring in bounded concurrent batches.
//!
//! A pass walks its candidates in fixed-size batches. Requests inside a
//! batch run concurrently, gated by a semaphore of the same width, and the
//! next batch starts only after every request in the current one has
//! settled. Each completion is written to the [`ResultBoard`] as soon as it
//! arrives so observers see the ranking grow while the pass runs.

use std::time::Instant;

use futures::future::join_all;
use geo::Coord;
use log::{debug, info, warn};
use roadside_core::{
    ConfigError, DetourResult, DirectionsProvider, Epoch, PointOfInterest, RouteGeometry,
    RouteRequest, RoutingError,
};
use tokio::sync::Semaphore;

use crate::board::ResultBoard;

/// Concurrent detour requests per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Tuning for [`DetourScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorerConfig {
    /// Requests issued together before waiting for the batch to settle.
    pub batch_size: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScorerConfig {
    /// Use `batch_size` concurrent requests per batch.
    #[must_use]
    pub const fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Reject a zero batch size.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroBatchSize`] when no request could run.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// Everything a pass needs to score one trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPass {
    /// Epoch the pass writes under.
    pub epoch: Epoch,
    /// Trip start.
    pub origin: Coord<f64>,
    /// Trip end.
    pub destination: Coord<f64>,
    /// Duration of the direct route in seconds.
    pub baseline_secs: u64,
    /// Requests per batch.
    pub batch_size: usize,
}

/// Counts reported when a pass returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Candidates handed to the pass.
    pub queued: usize,
    /// Candidates that produced a result.
    pub scored: usize,
    /// Candidates whose detour could not be routed.
    pub failed: usize,
    /// Settled requests dropped because the pass had gone stale.
    pub discarded: usize,
    /// Whether the pass stopped early because a newer epoch started.
    pub cancelled: bool,
}

enum Outcome {
    Scored,
    Failed,
    Discarded,
}

/// Scores detours through candidate points of interest.
#[derive(Debug)]
pub struct DetourScorer<D> {
    directions: D,
}

impl<D> DetourScorer<D>
where
    D: DirectionsProvider,
{
    /// Score with routes from `directions`.
    pub const fn new(directions: D) -> Self {
        Self { directions }
    }

    /// The directions provider in use.
    pub const fn directions(&self) -> &D {
        &self.directions
    }

    /// Fetch the direct route between `origin` and `destination`.
    ///
    /// # Errors
    /// Propagates the provider's [`RoutingError`], including
    /// [`RoutingError::NoRoute`] when no route comes back.
    pub async fn baseline(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<RouteGeometry, RoutingError> {
        let request = RouteRequest::direct(origin, destination);
        self.directions.route(&request).await?.into_primary()
    }

    /// Route through `poi` and measure the detour against the baseline.
    ///
    /// # Errors
    /// Returns the provider's [`RoutingError`] for this candidate.
    pub async fn score_one(
        &self,
        pass: &ScoringPass,
        poi: &PointOfInterest,
    ) -> Result<DetourResult, RoutingError> {
        let request = RouteRequest::via(pass.origin, pass.destination, poi.id.clone());
        let route = self.directions.route(&request).await?.into_primary()?;
        Ok(DetourResult::new(poi.clone(), route, pass.baseline_secs))
    }

    /// Score `candidates` onto `board`, one batch at a time.
    ///
    /// Failures are logged and skipped. Before each batch the pass checks
    /// whether its epoch is still current and stops if not; requests that
    /// settle after the epoch moved on are discarded by the board.
    pub async fn score_pass(
        &self,
        board: &ResultBoard,
        pass: &ScoringPass,
        candidates: &[PointOfInterest],
    ) -> PassSummary {
        let mut summary = PassSummary {
            queued: candidates.len(),
            ..PassSummary::default()
        };
        if !board.begin_pass(pass.epoch, candidates.len()) {
            summary.cancelled = true;
            return summary;
        }

        let width = pass.batch_size.max(1);
        let permits = Semaphore::new(width);
        let started = Instant::now();
        info!(
            "scoring {} candidates for epoch {} in batches of {width}",
            candidates.len(),
            pass.epoch
        );

        for batch in candidates.chunks(width) {
            if !board.is_current(pass.epoch) {
                summary.cancelled = true;
                break;
            }
            let settled = join_all(
                batch
                    .iter()
                    .map(|poi| self.score_and_record(board, pass, &permits, poi)),
            )
            .await;
            for outcome in settled {
                match outcome {
                    Outcome::Scored => summary.scored += 1,
                    Outcome::Failed => summary.failed += 1,
                    Outcome::Discarded => summary.discarded += 1,
                }
            }
        }

        if summary.discarded > 0 || !board.finish_pass(pass.epoch) {
            summary.cancelled = true;
        }
        info!(
            "epoch {} pass finished in {:?}: {} scored, {} failed, {} discarded{}",
            pass.epoch,
            started.elapsed(),
            summary.scored,
            summary.failed,
            summary.discarded,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        summary
    }

    async fn score_and_record(
        &self,
        board: &ResultBoard,
        pass: &ScoringPass,
        permits: &Semaphore,
        poi: &PointOfInterest,
    ) -> Outcome {
        let _permit = permits.acquire().await.ok();
        let outcome = match self.score_one(pass, poi).await {
            Ok(result) => {
                debug!(
                    "{} adds {}s ({}s total)",
                    poi.id, result.added_time_secs, result.total_time_secs
                );
                Some(result)
            }
            Err(err) => {
                warn!("skipping {}: {err}", poi.id);
                None
            }
        };
        let found = outcome.is_some();
        match (board.record(pass.epoch, outcome), found) {
            (false, _) => Outcome::Discarded,
            (true, true) => Outcome::Scored,
            (true, false) => Outcome::Failed,
        }
    }
}
