//! Wire types shared by both services.

use geo::Coord;
use serde::Deserialize;

/// Status returned when a request succeeded with data.
pub(crate) const STATUS_OK: &str = "OK";
/// Status returned when a request succeeded without data.
pub(crate) const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// A `{lat, lng}` object.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coord<f64> {
    fn from(value: LatLng) -> Self {
        Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

/// A `{value, text}` measurement; only the numeric value is used.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct Measure {
    #[serde(default)]
    pub value: u64,
}
