//! Scoring progress reported to observers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Label shown before any trip is planned or after a pass ends.
pub const READY_LABEL: &str = "Ready";
/// Label shown while candidates are being discovered.
pub const DISCOVERING_LABEL: &str = "Finding stops along the route";

/// Transient counters describing the current scoring pass.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use roadside_core::ScoringProgress;
///
/// let mut progress = ScoringProgress::starting(4);
/// progress.record_completion(true, Duration::from_secs(10));
/// assert_eq!(progress.completed_count, 1);
/// assert_eq!(progress.eta_seconds, Some(30));
/// assert_eq!(progress.label, "Checked 1 of 4 stops, 1 found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringProgress {
    /// Candidates queued in the current pass.
    pub total_candidates: usize,
    /// Candidates whose request has settled, successfully or not.
    pub completed_count: usize,
    /// Estimated seconds until the pass finishes.
    pub eta_seconds: Option<u64>,
    /// Candidates that produced a result.
    pub found_count: usize,
    /// Human-readable status.
    pub label: String,
    /// Whether a pass is running.
    pub in_progress: bool,
}

impl Default for ScoringProgress {
    fn default() -> Self {
        Self::idle()
    }
}

impl ScoringProgress {
    /// Nothing running.
    pub fn idle() -> Self {
        Self {
            total_candidates: 0,
            completed_count: 0,
            eta_seconds: None,
            found_count: 0,
            label: READY_LABEL.to_owned(),
            in_progress: false,
        }
    }

    /// Searching for candidates; totals are not yet known.
    pub fn discovering() -> Self {
        Self {
            label: DISCOVERING_LABEL.to_owned(),
            in_progress: true,
            ..Self::idle()
        }
    }

    /// A pass over `total` candidates is about to start.
    pub fn starting(total: usize) -> Self {
        let mut progress = Self {
            total_candidates: total,
            in_progress: true,
            ..Self::idle()
        };
        progress.label = progress.checked_label();
        progress
    }

    /// Count one settled request and refresh the estimate.
    pub fn record_completion(&mut self, found: bool, elapsed: Duration) {
        self.completed_count += 1;
        if found {
            self.found_count += 1;
        }
        self.eta_seconds = estimate_eta_secs(elapsed, self.completed_count, self.total_candidates);
        self.label = self.checked_label();
    }

    /// Mark the pass as finished, keeping the final counts.
    pub fn finish(&mut self) {
        self.in_progress = false;
        self.eta_seconds = Some(0);
        self.label = format!("{READY_LABEL}: {} found", self.found_count);
    }

    fn checked_label(&self) -> String {
        format!(
            "Checked {} of {} stops, {} found",
            self.completed_count, self.total_candidates, self.found_count
        )
    }
}

/// `round(elapsed / completed * (total - completed))` in seconds.
///
/// Returns `None` before anything has completed.
pub fn estimate_eta_secs(elapsed: Duration, completed: usize, total: usize) -> Option<u64> {
    if completed == 0 {
        return None;
    }
    let remaining = total.saturating_sub(completed);
    let per_item = elapsed.as_secs_f64() / completed as f64;
    Some((per_item * remaining as f64).round() as u64)
}
