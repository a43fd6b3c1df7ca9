//! Decoded route shapes and the 5-digit polyline text encoding.
//!
//! Routing services return route geometry as an encoded polyline. The codec
//! itself comes from the `polyline` crate; [`Polyline::decode`] turns the
//! text into `geo` coordinates before any geometric computation takes place.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::path_length_km;

/// Decimal places carried by the encoding.
pub const PRECISION: u32 = 5;

/// Errors returned when decoding, encoding or validating a polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The encoded text is not a valid polyline.
    #[error("invalid encoded polyline: {message}")]
    Decode {
        /// Description from the codec.
        message: String,
    },
    /// A point could not be encoded, usually because it is out of range.
    #[error("cannot encode polyline: {message}")]
    Encode {
        /// Description from the codec.
        message: String,
    },
    /// The polyline has fewer than two points and cannot describe a route.
    #[error("route polyline needs at least two points, found {count}")]
    TooFewPoints {
        /// Number of points present.
        count: usize,
    },
}

/// An ordered, decoded route shape.
///
/// # Examples
/// ```
/// use roadside_core::Polyline;
///
/// let polyline = Polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@")?;
/// assert_eq!(polyline.len(), 3);
/// assert!((polyline.points()[0].y - 38.5).abs() < 1e-9);
/// assert_eq!(polyline.encode()?, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// # Ok::<(), roadside_core::PolylineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coord<f64>>,
}

impl Polyline {
    /// Wrap an already decoded coordinate sequence.
    pub fn new(points: Vec<Coord<f64>>) -> Self {
        Self { points }
    }

    /// Decode a 5-digit-precision encoded polyline.
    ///
    /// An empty string decodes to an empty polyline.
    ///
    /// # Errors
    /// Returns [`PolylineError::Decode`] for text outside the polyline
    /// alphabet, truncated values or out-of-range coordinates.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let line = ::polyline::decode_polyline(encoded, PRECISION).map_err(|err| {
            PolylineError::Decode {
                message: err.to_string(),
            }
        })?;
        Ok(Self { points: line.0 })
    }

    /// Encode the polyline using 5-digit precision.
    ///
    /// # Errors
    /// Returns [`PolylineError::Encode`] when a point lies outside valid
    /// latitude or longitude ranges.
    pub fn encode(&self) -> Result<String, PolylineError> {
        ::polyline::encode_coordinates(self.points.iter().copied(), PRECISION).map_err(|err| {
            PolylineError::Encode {
                message: err.to_string(),
            }
        })
    }

    /// Borrow the decoded points.
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Consume the polyline and return its points.
    pub fn into_points(self) -> Vec<Coord<f64>> {
        self.points
    }

    /// Number of points in the polyline.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polyline has enough points to describe a route.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Return `self` when usable, otherwise [`PolylineError::TooFewPoints`].
    pub fn require_usable(&self) -> Result<&Self, PolylineError> {
        if self.is_usable() {
            Ok(self)
        } else {
            Err(PolylineError::TooFewPoints {
                count: self.points.len(),
            })
        }
    }

    /// Total route length in kilometres.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.points)
    }

    /// First point of the route, if any.
    pub fn first(&self) -> Option<Coord<f64>> {
        self.points.first().copied()
    }

    /// Last point of the route, if any.
    pub fn last(&self) -> Option<Coord<f64>> {
        self.points.last().copied()
    }
}

impl From<Vec<Coord<f64>>> for Polyline {
    fn from(points: Vec<Coord<f64>>) -> Self {
        Self::new(points)
    }
}
