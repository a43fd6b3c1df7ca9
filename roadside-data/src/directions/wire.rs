//! Directions response types.

use roadside_core::{
    Polyline, PolylineError, RouteGeometry, RouteLeg, RoutePlan, RouteStep,
};
use serde::Deserialize;

use crate::wire::{LatLng, Measure, STATUS_OK, STATUS_ZERO_RESULTS};

/// Status returned when an endpoint or waypoint could not be geocoded.
pub(crate) const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// Directions response.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    /// Status code, e.g. `"OK"`, `"ZERO_RESULTS"`, `"NOT_FOUND"`.
    pub status: String,
    /// Optional explanation when `status` is a failure.
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl DirectionsResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Whether the service found nothing to route.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.status == STATUS_ZERO_RESULTS || self.status == STATUS_NOT_FOUND
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteRecord {
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub legs: Vec<LegRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegRecord {
    #[serde(default)]
    pub duration: Measure,
    #[serde(default)]
    pub distance: Measure,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepRecord {
    #[serde(default)]
    pub html_instructions: String,
    #[serde(default)]
    pub duration: Measure,
    #[serde(default)]
    pub distance: Measure,
    pub end_location: LatLng,
}

impl RouteRecord {
    fn into_geometry(self) -> Result<RouteGeometry, PolylineError> {
        let polyline = Polyline::decode(&self.overview_polyline.points)?;
        let legs = self
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                duration_secs: leg.duration.value,
                distance_m: leg.distance.value,
                steps: leg
                    .steps
                    .into_iter()
                    .map(|step| RouteStep {
                        instruction: step.html_instructions,
                        duration_secs: step.duration.value,
                        distance_m: step.distance.value,
                        end: step.end_location.into(),
                    })
                    .collect(),
            })
            .collect();
        Ok(RouteGeometry::new(polyline, legs))
    }
}

/// Decode the primary route; alternatives are never used.
pub(crate) fn into_plan(routes: Vec<RouteRecord>) -> Result<RoutePlan, PolylineError> {
    let primary = routes
        .into_iter()
        .next()
        .map(RouteRecord::into_geometry)
        .transpose()?;
    Ok(RoutePlan::new(primary.into_iter().collect()))
}
