//! Route geometry returned by a directions service.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

/// A single turn-by-turn manoeuvre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text, possibly containing provider markup.
    pub instruction: String,
    /// Step duration in seconds.
    pub duration_secs: u64,
    /// Step distance in metres.
    pub distance_m: u64,
    /// Where the step ends.
    pub end: Coord<f64>,
}

/// One leg of a route between consecutive stops.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg duration in seconds.
    pub duration_secs: u64,
    /// Leg distance in metres.
    pub distance_m: u64,
    /// Turn-by-turn steps.
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

/// A route's decoded shape plus its legs.
///
/// # Examples
/// ```
/// use roadside_core::{Polyline, RouteGeometry, RouteLeg};
///
/// let route = RouteGeometry::new(
///     Polyline::default(),
///     vec![
///         RouteLeg { duration_secs: 600, distance_m: 9_000, steps: Vec::new() },
///         RouteLeg { duration_secs: 720, distance_m: 11_000, steps: Vec::new() },
///     ],
/// );
/// assert_eq!(route.total_duration_secs(), 1_320);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteGeometry {
    /// Decoded overview polyline.
    pub polyline: Polyline,
    /// Legs in travel order.
    pub legs: Vec<RouteLeg>,
}

impl RouteGeometry {
    /// Construct a route from its shape and legs.
    pub fn new(polyline: Polyline, legs: Vec<RouteLeg>) -> Self {
        Self { polyline, legs }
    }

    /// Sum of all leg durations.
    pub fn total_duration_secs(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_secs).sum()
    }

    /// Sum of all leg distances.
    pub fn total_distance_m(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_m).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leg(duration_secs: u64, distance_m: u64) -> RouteLeg {
        RouteLeg {
            duration_secs,
            distance_m,
            steps: Vec::new(),
        }
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![leg(1_200, 20_000)], 1_200)]
    #[case(vec![leg(500, 1), leg(700, 1), leg(1, 1)], 1_201)]
    fn sums_every_leg(#[case] legs: Vec<RouteLeg>, #[case] expected: u64) {
        let route = RouteGeometry::new(Polyline::default(), legs);
        assert_eq!(route.total_duration_secs(), expected);
    }

    #[rstest]
    fn sums_leg_distances() {
        let route = RouteGeometry::new(Polyline::default(), vec![leg(1, 250), leg(1, 750)]);
        assert_eq!(route.total_distance_m(), 1_000);
    }
}
