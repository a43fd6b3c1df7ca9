//! Merge search results from many sample points into one candidate set.

use std::collections::HashSet;

use log::debug;

use crate::corridor::{CorridorWidth, filter_to_corridor};
use crate::geometry::validate_location;
use crate::poi::PointOfInterest;
use crate::polyline::Polyline;

/// Deduplicating accumulator for discovered points of interest.
///
/// The first record seen for an id wins; later duplicates are ignored even
/// when their attributes differ. Records with unusable coordinates are
/// dropped and counted.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::{CandidateAggregator, PointOfInterest};
///
/// let mut aggregator = CandidateAggregator::new();
/// let here = Coord { x: 0.0, y: 0.0 };
/// aggregator.ingest([PointOfInterest::new("a", "First", here)]);
/// aggregator.ingest([PointOfInterest::new("a", "Second", here)]);
///
/// let pois = aggregator.into_pois();
/// assert_eq!(pois.len(), 1);
/// assert_eq!(pois[0].name, "First");
/// ```
#[derive(Debug, Default)]
pub struct CandidateAggregator {
    seen: HashSet<String>,
    pois: Vec<PointOfInterest>,
    dropped: usize,
}

impl CandidateAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a batch of results, returning how many were new.
    pub fn ingest<I>(&mut self, pois: I) -> usize
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        let before = self.pois.len();
        for poi in pois {
            if let Err(err) = validate_location(poi.location) {
                debug!("dropping {} ({}): {err}", poi.id, poi.name);
                self.dropped += 1;
                continue;
            }
            if self.seen.insert(poi.id.clone()) {
                self.pois.push(poi);
            }
        }
        self.pois.len() - before
    }

    /// Number of distinct points of interest held.
    pub fn len(&self) -> usize {
        self.pois.len()
    }

    /// Whether nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Records dropped for unusable coordinates.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Whether `id` has already been accepted.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Borrow the accepted points of interest in discovery order.
    pub fn pois(&self) -> &[PointOfInterest] {
        &self.pois
    }

    /// Take the accepted points of interest in discovery order.
    pub fn into_pois(self) -> Vec<PointOfInterest> {
        self.pois
    }

    /// Take the accepted points of interest that fall inside the corridor.
    pub fn into_corridor(self, route: &Polyline, width: CorridorWidth) -> Vec<PointOfInterest> {
        filter_to_corridor(&self.pois, route, width)
    }
}
