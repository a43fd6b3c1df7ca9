//! Shared, epoch-guarded result state.
//!
//! The board is the one place scoring completions write to. Every mutation
//! takes the same lock, checks that the caller's epoch is still current,
//! updates the result set and progress, re-sorts, and publishes a fresh
//! [`ScoringSnapshot`] before releasing the lock. Work from a stale epoch is
//! rejected without touching state.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use roadside_core::{
    DetourResult, Epoch, ResultSet, RouteGeometry, ScoringProgress, ScoringSnapshot,
};
use tokio::sync::watch;

#[derive(Debug, Default)]
struct BoardState {
    epoch: Epoch,
    results: ResultSet,
    progress: ScoringProgress,
    baseline: Option<RouteGeometry>,
    pass_started: Option<Instant>,
}

/// Ranked detour results and progress for the current epoch.
///
/// # Examples
/// ```
/// use roadside_scorer::ResultBoard;
///
/// let board = ResultBoard::new();
/// let epoch = board.invalidate();
/// assert!(board.is_current(epoch));
/// assert!(!board.is_current(epoch - 1));
/// assert!(board.snapshot().results.is_empty());
/// ```
#[derive(Debug)]
pub struct ResultBoard {
    state: Mutex<BoardState>,
    publisher: watch::Sender<ScoringSnapshot>,
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBoard {
    /// Create an empty board at epoch zero.
    #[must_use]
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(ScoringSnapshot::default());
        Self {
            state: Mutex::new(BoardState::default()),
            publisher,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &BoardState) {
        self.publisher.send_replace(ScoringSnapshot {
            epoch: state.epoch,
            results: state.results.ranked(),
            progress: state.progress.clone(),
        });
    }

    /// Receive a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ScoringSnapshot> {
        self.publisher.subscribe()
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ScoringSnapshot {
        self.publisher.borrow().clone()
    }

    /// The epoch currently accepting results.
    #[must_use]
    pub fn current_epoch(&self) -> Epoch {
        self.lock().epoch
    }

    /// Whether `epoch` is still current.
    #[must_use]
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.lock().epoch == epoch
    }

    /// Start a new epoch, discarding results, baseline and progress.
    ///
    /// Any pass still running under the previous epoch becomes stale.
    pub fn invalidate(&self) -> Epoch {
        let mut state = self.lock();
        let epoch = state.epoch.wrapping_add(1);
        *state = BoardState {
            epoch,
            ..BoardState::default()
        };
        self.publish(&state);
        epoch
    }

    /// Record the direct route for `epoch`.
    pub fn set_baseline(&self, epoch: Epoch, route: RouteGeometry) -> bool {
        let mut state = self.lock();
        if state.epoch != epoch {
            return false;
        }
        state.baseline = Some(route);
        true
    }

    /// The direct route of the current epoch, once fetched.
    #[must_use]
    pub fn baseline(&self) -> Option<RouteGeometry> {
        self.lock().baseline.clone()
    }

    /// Show that candidates are being discovered.
    pub fn mark_discovering(&self, epoch: Epoch) -> bool {
        self.update(epoch, |state| state.progress = ScoringProgress::discovering())
    }

    /// Start a scoring pass over `total` candidates.
    ///
    /// Existing results are kept so later passes append to earlier ones.
    pub fn begin_pass(&self, epoch: Epoch, total: usize) -> bool {
        self.update(epoch, |state| {
            state.progress = ScoringProgress::starting(total);
            state.pass_started = Some(Instant::now());
        })
    }

    /// Record one settled candidate; `None` marks a failure.
    ///
    /// Returns `false`, leaving state untouched, when `epoch` is stale.
    pub fn record(&self, epoch: Epoch, outcome: Option<DetourResult>) -> bool {
        self.update(epoch, |state| {
            let found = outcome.is_some();
            if let Some(result) = outcome {
                state.results.upsert(result);
            }
            let elapsed = state
                .pass_started
                .map(|started| started.elapsed())
                .unwrap_or_default();
            state.progress.record_completion(found, elapsed);
        })
    }

    /// Mark the pass as complete.
    pub fn finish_pass(&self, epoch: Epoch) -> bool {
        self.update(epoch, |state| {
            state.progress.finish();
            state.pass_started = None;
        })
    }

    /// Clear the in-progress indicator after a fatal failure.
    pub fn abort(&self, epoch: Epoch) -> bool {
        self.update(epoch, |state| {
            state.progress = ScoringProgress::idle();
            state.pass_started = None;
        })
    }

    /// Ids of every point of interest scored in the current epoch.
    #[must_use]
    pub fn scored_ids(&self) -> HashSet<String> {
        self.lock().results.ids().map(str::to_owned).collect()
    }

    fn update(&self, epoch: Epoch, change: impl FnOnce(&mut BoardState)) -> bool {
        let mut state = self.lock();
        if state.epoch != epoch {
            return false;
        }
        change(&mut state);
        self.publish(&state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use roadside_core::{PointOfInterest, RouteLeg};
    use rstest::{fixture, rstest};

    fn result(id: &str, total: u64) -> DetourResult {
        let route = RouteGeometry::new(
            Default::default(),
            vec![RouteLeg {
                duration_secs: total,
                ..RouteLeg::default()
            }],
        );
        DetourResult::new(
            PointOfInterest::new(id, id, Coord { x: 0.0, y: 0.0 }),
            route,
            1_000,
        )
    }

    #[fixture]
    fn board() -> ResultBoard {
        ResultBoard::new()
    }

    #[rstest]
    fn records_are_published_in_rank_order(board: ResultBoard) {
        let epoch = board.invalidate();
        assert!(board.begin_pass(epoch, 2));
        assert!(board.record(epoch, Some(result("slow", 1_300))));
        assert!(board.record(epoch, Some(result("quick", 1_100))));

        let snapshot = board.snapshot();
        let ids: Vec<_> = snapshot.results.iter().map(|r| r.poi.id.as_str()).collect();
        assert_eq!(ids, ["quick", "slow"]);
        assert_eq!(snapshot.progress.completed_count, 2);
        assert_eq!(snapshot.epoch, epoch);
    }

    #[rstest]
    fn stale_records_are_rejected(board: ResultBoard) {
        let stale = board.invalidate();
        let current = board.invalidate();

        assert!(!board.record(stale, Some(result("late", 1_000))));
        assert!(board.snapshot().results.is_empty());
        assert_eq!(board.current_epoch(), current);
    }

    #[rstest]
    fn invalidation_resets_results_and_progress(board: ResultBoard) {
        let epoch = board.invalidate();
        board.begin_pass(epoch, 1);
        board.record(epoch, Some(result("a", 1_000)));
        board.invalidate();

        let snapshot = board.snapshot();
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.progress, ScoringProgress::idle());
        assert!(board.baseline().is_none());
    }

    #[rstest]
    fn failures_advance_progress_without_results(board: ResultBoard) {
        let epoch = board.invalidate();
        board.begin_pass(epoch, 2);
        board.record(epoch, None);

        let snapshot = board.snapshot();
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.progress.completed_count, 1);
        assert_eq!(snapshot.progress.found_count, 0);
    }

    #[rstest]
    fn abort_clears_in_progress(board: ResultBoard) {
        let epoch = board.invalidate();
        board.mark_discovering(epoch);
        assert!(board.snapshot().progress.in_progress);
        board.abort(epoch);
        assert!(!board.snapshot().progress.in_progress);
    }

    #[rstest]
    fn subscribers_see_every_publish(board: ResultBoard) {
        let mut receiver = board.subscribe();
        let epoch = board.invalidate();
        assert!(receiver.has_changed().expect("sender alive"));
        assert_eq!(receiver.borrow_and_update().epoch, epoch);
        board.begin_pass(epoch, 1);
        assert!(receiver.has_changed().expect("sender alive"));
    }
}
