//! Geographic primitives for measuring distance from a route.
//!
//! Coordinates are WGS84 [`Coord`] values with `x = longitude` and
//! `y = latitude`. Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`].
//!
//! Offsets from a route are found by projecting onto each segment in a local
//! equirectangular frame scaled by the segment's mean latitude. The projected
//! point is mapped back to latitude/longitude and measured with
//! [`haversine_km`]. The approximation holds for segments up to tens of
//! kilometres, which covers the sampling densities used along a corridor.
//!
//! # Examples
//! ```
//! use geo::Coord;
//! use roadside_core::geometry::{haversine_km, point_to_polyline_offset_km};
//!
//! let start = Coord { x: 0.0, y: 0.0 };
//! let end = Coord { x: 1.0, y: 0.0 };
//! assert!((haversine_km(start, end) - 111.19).abs() < 0.01);
//!
//! let offset = point_to_polyline_offset_km(Coord { x: 0.5, y: 0.01 }, &[start, end]);
//! assert!((offset - 1.112).abs() < 0.01);
//! ```

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius used for all great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors returned by [`validate_location`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate component was NaN or infinite.
    #[error("coordinate ({lat}, {lng}) is not finite")]
    NonFinite {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
    /// Latitude fell outside `[-90, 90]` or longitude outside `[-180, 180]`.
    #[error("coordinate ({lat}, {lng}) is outside the valid latitude/longitude range")]
    OutOfRange {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
}

/// Check that `location` is a usable WGS84 position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::geometry::{GeoError, validate_location};
///
/// assert!(validate_location(Coord { x: -0.12, y: 51.5 }).is_ok());
/// assert!(matches!(
///     validate_location(Coord { x: 0.0, y: 91.0 }),
///     Err(GeoError::OutOfRange { .. })
/// ));
/// ```
pub fn validate_location(location: Coord<f64>) -> Result<Coord<f64>, GeoError> {
    let (lat, lng) = (location.y, location.x);
    if !lat.is_finite() || !lng.is_finite() {
        return Err(GeoError::NonFinite { lat, lng });
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(GeoError::OutOfRange { lat, lng });
    }
    Ok(location)
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lng = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Position along a route and perpendicular distance from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProjection {
    /// Distance from the start of the route to the projected point.
    pub along_km: f64,
    /// Distance from the query point to the projected point.
    pub offset_km: f64,
}

/// Closest point on one segment, with its clamped parameter.
#[derive(Debug, Clone, Copy)]
struct SegmentProjection {
    t: f64,
    offset_km: f64,
}

fn project_onto_segment(
    point: Coord<f64>,
    start: Coord<f64>,
    end: Coord<f64>,
) -> SegmentProjection {
    let lng_scale = ((start.y + end.y) / 2.0).to_radians().cos();
    let seg_x = (end.x - start.x) * lng_scale;
    let seg_y = end.y - start.y;
    let rel_x = (point.x - start.x) * lng_scale;
    let rel_y = point.y - start.y;

    let length_sq = seg_x * seg_x + seg_y * seg_y;
    // Degenerate segments collapse onto their start vertex.
    let t = if length_sq > 0.0 {
        ((rel_x * seg_x + rel_y * seg_y) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let projected = Coord {
        x: start.x + t * (end.x - start.x),
        y: start.y + t * (end.y - start.y),
    };
    SegmentProjection {
        t,
        offset_km: haversine_km(point, projected),
    }
}

/// Distance in kilometres from `point` to the closest point of a segment.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end are measured to the nearest endpoint rather than the infinite line.
pub fn point_to_segment_offset_km(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    project_onto_segment(point, start, end).offset_km
}

/// Minimum offset from `point` to any segment of `polyline`.
///
/// Returns `f64::INFINITY` when the polyline has fewer than two points.
pub fn point_to_polyline_offset_km(point: Coord<f64>, polyline: &[Coord<f64>]) -> f64 {
    polyline
        .windows(2)
        .filter_map(|pair| match *pair {
            [start, end] => Some(point_to_segment_offset_km(point, start, end)),
            _ => None,
        })
        .fold(f64::INFINITY, f64::min)
}

/// Project `point` onto `polyline`, returning its along-route distance and
/// offset for the closest segment.
///
/// Ties resolve to the first segment with the minimal offset. Returns `None`
/// when the polyline has fewer than two points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::geometry::project_onto_polyline;
///
/// let route = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.2, y: 0.0 }];
/// let projection = project_onto_polyline(Coord { x: 0.1, y: 0.01 }, &route)
///     .expect("route has a segment");
/// assert!((projection.along_km - 11.119).abs() < 0.01);
/// assert!((projection.offset_km - 1.112).abs() < 0.01);
/// ```
pub fn project_onto_polyline(point: Coord<f64>, polyline: &[Coord<f64>]) -> Option<RouteProjection> {
    let mut best: Option<RouteProjection> = None;
    let mut travelled_km = 0.0;

    for pair in polyline.windows(2) {
        let [start, end] = *pair else { continue };
        let segment_km = haversine_km(start, end);
        let projection = project_onto_segment(point, start, end);
        if best.is_none_or(|current| projection.offset_km < current.offset_km) {
            best = Some(RouteProjection {
                along_km: travelled_km + projection.t * segment_km,
                offset_km: projection.offset_km,
            });
        }
        travelled_km += segment_km;
    }

    best
}

/// Total length of `polyline` as the sum of consecutive haversine distances.
pub fn path_length_km(polyline: &[Coord<f64>]) -> f64 {
    polyline
        .windows(2)
        .filter_map(|pair| match *pair {
            [start, end] => Some(haversine_km(start, end)),
            _ => None,
        })
        .sum()
}
