//! Pick the points along a route where nearby searches are issued.

use geo::Coord;
use thiserror::Error;

use crate::geometry::haversine_km;
use crate::polyline::Polyline;

/// Errors returned by [`sample_route`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// The route has fewer than two points.
    #[error("route needs at least two points to sample, found {count}")]
    TooFewPoints {
        /// Number of points present.
        count: usize,
    },
    /// Spacing was not a positive finite distance.
    #[error("sample spacing must be positive and finite, got {km} km")]
    InvalidSpacing {
        /// Rejected spacing.
        km: f64,
    },
}

/// Walk `route` and emit sample points roughly `spacing_km` apart.
///
/// The first vertex is always emitted. Segment lengths accumulate and the
/// vertex that closes a run of at least `spacing_km` is emitted before the
/// accumulator resets. The last vertex is always emitted so the end of the
/// route is searched, and never twice.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::{Polyline, sample_route};
///
/// let route = Polyline::new(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 0.0, y: 0.1 },
///     Coord { x: 0.0, y: 0.2 },
/// ]);
/// let samples = sample_route(&route, 100.0)?;
/// assert_eq!(samples, vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.2 }]);
/// # Ok::<(), roadside_core::SamplingError>(())
/// ```
pub fn sample_route(route: &Polyline, spacing_km: f64) -> Result<Vec<Coord<f64>>, SamplingError> {
    if !(spacing_km.is_finite() && spacing_km > 0.0) {
        return Err(SamplingError::InvalidSpacing { km: spacing_km });
    }
    let points = route.points();
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Err(SamplingError::TooFewPoints { count: 0 });
    };
    if points.len() < 2 {
        return Err(SamplingError::TooFewPoints {
            count: points.len(),
        });
    }

    let mut samples = vec![first];
    let mut last_emitted = 0;
    let mut accumulated = 0.0;
    for (index, pair) in points.windows(2).enumerate() {
        accumulated += haversine_km(pair[0], pair[1]);
        if accumulated >= spacing_km {
            samples.push(pair[1]);
            last_emitted = index + 1;
            accumulated = 0.0;
        }
    }
    if last_emitted != points.len() - 1 {
        samples.push(last);
    }
    Ok(samples)
}
