//! Spread scoring candidates evenly along the route.
//!
//! Taking the first N corridor hits biases results towards the start of the
//! trip. Instead the route is cut into `cap` equal-length bins and each bin
//! contributes at most its closest-to-route point of interest.

use std::cmp::Ordering;

use crate::geometry::project_onto_polyline;
use crate::poi::PointOfInterest;
use crate::polyline::Polyline;

/// Smallest bin width, guarding zero-length routes.
pub const MIN_BIN_WIDTH_KM: f64 = 1e-6;

/// A point of interest positioned relative to the route.
#[derive(Debug, Clone, PartialEq)]
pub struct DetourCandidate {
    /// The point of interest.
    pub poi: PointOfInterest,
    /// Distance from the route start to its projection.
    pub along_route_km: f64,
    /// Perpendicular distance from the route.
    pub offset_km: f64,
}

impl DetourCandidate {
    /// Project `poi` onto `route`. Returns `None` for unusable routes.
    pub fn locate(poi: PointOfInterest, route: &Polyline) -> Option<Self> {
        let projection = project_onto_polyline(poi.location, route.points())?;
        Some(Self {
            poi,
            along_route_km: projection.along_km,
            offset_km: projection.offset_km,
        })
    }
}

/// Width of one bin when `total_km` is split into `bin_count` bins.
pub fn bin_width_km(total_km: f64, bin_count: usize) -> f64 {
    if bin_count == 0 {
        return total_km.max(MIN_BIN_WIDTH_KM);
    }
    (total_km / bin_count as f64).max(MIN_BIN_WIDTH_KM)
}

/// Bin holding along-route distance `along_km`, clamped into
/// `[0, bin_count - 1]`.
///
/// # Examples
/// ```
/// use roadside_core::binning::bin_index;
///
/// assert_eq!(bin_index(0.0, 10.0, 3), 0);
/// assert_eq!(bin_index(15.0, 10.0, 3), 1);
/// assert_eq!(bin_index(30.0, 10.0, 3), 2);
/// assert_eq!(bin_index(-1.0, 10.0, 3), 0);
/// ```
pub fn bin_index(along_km: f64, bin_width_km: f64, bin_count: usize) -> usize {
    let last = bin_count.saturating_sub(1);
    let raw = (along_km / bin_width_km).floor();
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate, so huge values clamp to `last` below.
    (raw as usize).min(last)
}

/// Choose at most `cap` candidates, one per along-route bin.
///
/// Each bin keeps the point of interest with the smallest offset; ties keep
/// the one seen first. Output follows bin order from the route start.
pub fn select_candidates(
    pois: &[PointOfInterest],
    route: &Polyline,
    cap: usize,
) -> Vec<PointOfInterest> {
    if cap == 0 {
        return Vec::new();
    }
    let width = bin_width_km(route.length_km(), cap);
    let mut bins: Vec<Option<DetourCandidate>> = vec![None; cap];

    for poi in pois {
        let Some(candidate) = DetourCandidate::locate(poi.clone(), route) else {
            continue;
        };
        let slot = &mut bins[bin_index(candidate.along_route_km, width, cap)];
        let replace = slot
            .as_ref()
            .is_none_or(|held| candidate.offset_km < held.offset_km);
        if replace {
            *slot = Some(candidate);
        }
    }

    let mut selected: Vec<DetourCandidate> = bins.into_iter().flatten().collect();
    if selected.len() > cap {
        selected.sort_by(|a, b| {
            a.offset_km
                .partial_cmp(&b.offset_km)
                .unwrap_or(Ordering::Equal)
        });
        selected.truncate(cap);
    }
    selected.into_iter().map(|candidate| candidate.poi).collect()
}
