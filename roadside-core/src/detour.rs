//! Scored detours and the ranked result set.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::poi::PointOfInterest;
use crate::route::RouteGeometry;

/// The outcome of routing through one point of interest.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::{DetourResult, PointOfInterest, RouteGeometry, RouteLeg};
///
/// let poi = PointOfInterest::new("a", "Diner", Coord { x: 0.0, y: 0.0 });
/// let route = RouteGeometry::new(
///     Default::default(),
///     vec![RouteLeg { duration_secs: 1_100, ..RouteLeg::default() }],
/// );
/// let result = DetourResult::new(poi, route, 1_200);
/// assert_eq!(result.total_time_secs, 1_100);
/// assert_eq!(result.added_time_secs, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetourResult {
    /// The point of interest visited.
    pub poi: PointOfInterest,
    /// The detour route.
    pub route: RouteGeometry,
    /// Sum of the detour's leg durations.
    pub total_time_secs: u64,
    /// Extra time over the baseline route, floored at zero.
    pub added_time_secs: u64,
}

impl DetourResult {
    /// Build a result, deriving both times from `route` and the baseline.
    pub fn new(poi: PointOfInterest, route: RouteGeometry, baseline_secs: u64) -> Self {
        let total_time_secs = route.total_duration_secs();
        Self {
            poi,
            route,
            total_time_secs,
            added_time_secs: total_time_secs.saturating_sub(baseline_secs),
        }
    }
}

/// Ranking order: least added time, then least total time.
///
/// The point of interest id breaks remaining ties so repeated sorts of the
/// same results agree.
pub fn rank_order(a: &DetourResult, b: &DetourResult) -> Ordering {
    a.added_time_secs
        .cmp(&b.added_time_secs)
        .then(a.total_time_secs.cmp(&b.total_time_secs))
        .then_with(|| a.poi.id.cmp(&b.poi.id))
}

/// Scored detours keyed by point of interest id.
///
/// Inserting a result for an id already present replaces it.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    by_id: HashMap<String, DetourResult>,
}

impl ResultSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for its point of interest.
    ///
    /// Returns the previous result for that id, if any.
    pub fn upsert(&mut self, result: DetourResult) -> Option<DetourResult> {
        self.by_id.insert(result.poi.id.clone(), result)
    }

    /// Whether a result exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Look up the result for `id`.
    pub fn get(&self, id: &str) -> Option<&DetourResult> {
        self.by_id.get(id)
    }

    /// Number of scored points of interest.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing has been scored.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Ids of every scored point of interest.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    /// Drop all results.
    pub fn clear(&mut self) {
        self.by_id.clear();
    }

    /// All results sorted by [`rank_order`].
    pub fn ranked(&self) -> Vec<DetourResult> {
        let mut results: Vec<_> = self.by_id.values().cloned().collect();
        results.sort_by(rank_order);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteLeg;
    use geo::Coord;
    use rstest::rstest;

    fn result(id: &str, total: u64, baseline: u64) -> DetourResult {
        let poi = PointOfInterest::new(id, id, Coord { x: 0.0, y: 0.0 });
        let route = RouteGeometry::new(
            Default::default(),
            vec![RouteLeg {
                duration_secs: total,
                ..RouteLeg::default()
            }],
        );
        DetourResult::new(poi, route, baseline)
    }

    #[rstest]
    #[case(1_500, 1_200, 300)]
    #[case(1_200, 1_200, 0)]
    #[case(900, 1_200, 0)]
    fn added_time_is_floored_at_zero(
        #[case] total: u64,
        #[case] baseline: u64,
        #[case] added: u64,
    ) {
        assert_eq!(result("a", total, baseline).added_time_secs, added);
    }

    #[rstest]
    fn rescoring_replaces_rather_than_duplicates() {
        let mut set = ResultSet::new();
        assert!(set.upsert(result("a", 1_500, 1_200)).is_none());
        let previous = set.upsert(result("a", 1_300, 1_200));

        assert_eq!(previous.map(|r| r.total_time_secs), Some(1_500));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").map(|r| r.added_time_secs), Some(100));
    }

    #[rstest]
    fn ranks_by_added_then_total_time() {
        let mut set = ResultSet::new();
        // Both `slow` and `fast` add nothing; `fast` has the shorter total.
        set.upsert(result("slow", 1_150, 1_200));
        set.upsert(result("detour", 1_400, 1_200));
        set.upsert(result("fast", 1_000, 1_200));

        let ids: Vec<_> = set.ranked().into_iter().map(|r| r.poi.id).collect();
        assert_eq!(ids, ["fast", "slow", "detour"]);
    }

    #[rstest]
    fn clear_empties_the_set() {
        let mut set = ResultSet::new();
        set.upsert(result("a", 1, 0));
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains("a"));
    }
}
