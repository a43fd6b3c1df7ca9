//! Corridor sizing and the corridor membership filter.
//!
//! The corridor is the band of land within a fixed perpendicular distance of
//! the route. Its width is user-adjustable in whole-mile terms but stored in
//! kilometres.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::point_to_polyline_offset_km;
use crate::poi::PointOfInterest;
use crate::polyline::Polyline;

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;
/// Narrowest user-selectable corridor.
pub const MIN_WIDTH_MILES: f64 = 1.0;
/// Widest user-selectable corridor.
pub const MAX_WIDTH_MILES: f64 = 6.0;
/// Corridor width used when nothing is configured.
pub const DEFAULT_WIDTH_MILES: f64 = 3.0;
/// Spacing between search sample points when nothing is configured.
pub const DEFAULT_SAMPLE_SPACING_KM: f64 = 8.0;
/// Candidates scored per pass when nothing is configured.
pub const DEFAULT_MAX_CANDIDATES: usize = 30;

/// Errors raised when corridor, search or scoring configuration is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Corridor width was not a positive finite number of kilometres.
    #[error("corridor width must be positive and finite, got {km} km")]
    InvalidWidth {
        /// Rejected width.
        km: f64,
    },
    /// Corridor width fell outside the user-selectable range.
    #[error("corridor width must be between {MIN_WIDTH_MILES} and {MAX_WIDTH_MILES} miles, got {miles}")]
    WidthOutOfRange {
        /// Rejected width.
        miles: f64,
    },
    /// Sample spacing was not a positive finite number of kilometres.
    #[error("sample spacing must be positive and finite, got {km} km")]
    InvalidSpacing {
        /// Rejected spacing.
        km: f64,
    },
    /// The candidate cap was zero.
    #[error("at least one candidate must be scored per pass")]
    ZeroCandidates,
    /// Scoring batch size was zero.
    #[error("scoring batch size must be at least one")]
    ZeroBatchSize,
}

/// Perpendicular half-width of the corridor.
///
/// # Examples
/// ```
/// use roadside_core::CorridorWidth;
///
/// let width = CorridorWidth::from_miles(2.0)?;
/// assert!((width.km() - 3.21868).abs() < 1e-9);
/// assert!(CorridorWidth::from_miles(7.0).is_err());
/// # Ok::<(), roadside_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CorridorWidth(f64);

impl CorridorWidth {
    /// Accept any positive finite width in kilometres.
    pub fn from_km(km: f64) -> Result<Self, ConfigError> {
        if km.is_finite() && km > 0.0 {
            Ok(Self(km))
        } else {
            Err(ConfigError::InvalidWidth { km })
        }
    }

    /// Accept a width in the user-selectable mile range.
    pub fn from_miles(miles: f64) -> Result<Self, ConfigError> {
        if !(MIN_WIDTH_MILES..=MAX_WIDTH_MILES).contains(&miles) {
            return Err(ConfigError::WidthOutOfRange { miles });
        }
        Self::from_km(miles * KM_PER_MILE)
    }

    /// Width in kilometres.
    pub fn km(self) -> f64 {
        self.0
    }

    /// Width in miles.
    pub fn miles(self) -> f64 {
        self.0 / KM_PER_MILE
    }
}

impl Default for CorridorWidth {
    fn default() -> Self {
        Self(DEFAULT_WIDTH_MILES * KM_PER_MILE)
    }
}

impl TryFrom<f64> for CorridorWidth {
    type Error = ConfigError;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        Self::from_km(km)
    }
}

impl From<CorridorWidth> for f64 {
    fn from(width: CorridorWidth) -> Self {
        width.0
    }
}

/// How candidates are discovered and capped along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Corridor half-width.
    pub width: CorridorWidth,
    /// Distance between search sample points in kilometres.
    pub sample_spacing_km: f64,
    /// Bin count and upper bound on candidates scored per pass.
    pub max_candidates: usize,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            width: CorridorWidth::default(),
            sample_spacing_km: DEFAULT_SAMPLE_SPACING_KM,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl CorridorConfig {
    /// Set the corridor width.
    #[must_use]
    pub fn with_width(mut self, width: CorridorWidth) -> Self {
        self.width = width;
        self
    }

    /// Set the sample spacing.
    #[must_use]
    pub fn with_sample_spacing_km(mut self, km: f64) -> Self {
        self.sample_spacing_km = km;
        self
    }

    /// Set the candidate cap.
    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Check spacing and cap. The width is validated on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spacing = self.sample_spacing_km;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(ConfigError::InvalidSpacing { km: spacing });
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::ZeroCandidates);
        }
        Ok(())
    }
}

/// Keep the points of interest whose offset from `route` is within `width`.
///
/// Order is preserved. The boundary is inclusive.
pub fn filter_to_corridor(
    pois: &[PointOfInterest],
    route: &Polyline,
    width: CorridorWidth,
) -> Vec<PointOfInterest> {
    pois.iter()
        .filter(|poi| point_to_polyline_offset_km(poi.location, route.points()) <= width.km())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    #[case(1.0)]
    #[case(3.5)]
    #[case(6.0)]
    fn accepts_selectable_miles(#[case] miles: f64) {
        let width = CorridorWidth::from_miles(miles).expect("in range");
        assert!((width.miles() - miles).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.5)]
    #[case(6.5)]
    #[case(f64::NAN)]
    fn rejects_miles_outside_range(#[case] miles: f64) {
        assert!(CorridorWidth::from_miles(miles).is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_degenerate_km(#[case] km: f64) {
        assert!(matches!(
            CorridorWidth::from_km(km),
            Err(ConfigError::InvalidWidth { .. })
        ));
    }

    #[rstest]
    fn default_width_is_three_miles() {
        assert!((CorridorWidth::default().km() - 4.82802).abs() < 1e-6);
    }

    #[rstest]
    #[case(CorridorConfig::default().with_sample_spacing_km(0.0))]
    #[case(CorridorConfig::default().with_sample_spacing_km(f64::NAN))]
    #[case(CorridorConfig::default().with_max_candidates(0))]
    fn validation_rejects_unusable_config(#[case] config: CorridorConfig) {
        assert!(config.validate().is_err());
    }

    #[rstest]
    fn filter_keeps_points_within_width() {
        let route = Polyline::new(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }]);
        // One hundredth of a degree of latitude is about 1.11 km.
        let near = PointOfInterest::new("near", "Near", Coord { x: 0.5, y: 0.01 });
        let far = PointOfInterest::new("far", "Far", Coord { x: 0.5, y: 0.05 });
        let width = CorridorWidth::from_km(2.0).expect("valid");

        let kept = filter_to_corridor(&[near, far], &route, width);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "near");
    }
}
