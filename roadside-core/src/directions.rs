//! Fetch driving routes, optionally constrained through a waypoint.
//!
//! The [`DirectionsProvider`] trait abstracts a routing service. The engine
//! asks it for the direct baseline route once per trip and then for one
//! detour route per candidate, passing the candidate's provider id as the
//! waypoint.
//!
//! Only the first route of a [`RoutePlan`] is ever used.

use std::sync::Arc;

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::route::RouteGeometry;

/// Errors from [`DirectionsProvider::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The request could not reach the service.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The service answered but reported a failure status.
    #[error("directions service returned {status}: {message}")]
    Service {
        /// Service status code, e.g. `INVALID_REQUEST`.
        status: String,
        /// Optional explanation from the service.
        message: String,
    },
    /// The response body could not be understood.
    #[error("failed to parse directions response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
    /// The service returned no routes.
    #[error("no route found")]
    NoRoute,
}

/// A directions query.
///
/// Coordinates are formatted as `"lat,lng"` on the wire. The waypoint is a
/// place id understood by the routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Trip start.
    pub origin: Coord<f64>,
    /// Trip end.
    pub destination: Coord<f64>,
    /// Place id the route must pass through.
    pub waypoint: Option<String>,
}

impl RouteRequest {
    /// Direct route with no intermediate stop.
    pub fn direct(origin: Coord<f64>, destination: Coord<f64>) -> Self {
        Self {
            origin,
            destination,
            waypoint: None,
        }
    }

    /// Route constrained to pass through `place_id`.
    pub fn via(origin: Coord<f64>, destination: Coord<f64>, place_id: impl Into<String>) -> Self {
        Self {
            origin,
            destination,
            waypoint: Some(place_id.into()),
        }
    }
}

/// Candidate routes answering a [`RouteRequest`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePlan {
    /// Routes in the order the service ranked them.
    pub routes: Vec<RouteGeometry>,
}

impl RoutePlan {
    /// Wrap a list of routes.
    pub fn new(routes: Vec<RouteGeometry>) -> Self {
        Self { routes }
    }

    /// Take the first route, or [`RoutingError::NoRoute`] when empty.
    pub fn into_primary(self) -> Result<RouteGeometry, RoutingError> {
        self.routes.into_iter().next().ok_or(RoutingError::NoRoute)
    }
}

/// Resolve driving routes.
///
/// Implementations must be shareable across concurrently running detour
/// requests.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use roadside_core::{
///     DirectionsProvider, Polyline, RouteGeometry, RouteLeg, RoutePlan, RouteRequest,
///     RoutingError,
/// };
///
/// struct FixedDuration(u64);
///
/// #[async_trait]
/// impl DirectionsProvider for FixedDuration {
///     async fn route(&self, _request: &RouteRequest) -> Result<RoutePlan, RoutingError> {
///         let leg = RouteLeg { duration_secs: self.0, ..RouteLeg::default() };
///         Ok(RoutePlan::new(vec![RouteGeometry::new(Polyline::default(), vec![leg])]))
///     }
/// }
/// ```
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Return candidate routes for `request`.
    async fn route(&self, request: &RouteRequest) -> Result<RoutePlan, RoutingError>;
}

#[async_trait]
impl<T> DirectionsProvider for Arc<T>
where
    T: DirectionsProvider + ?Sized,
{
    async fn route(&self, request: &RouteRequest) -> Result<RoutePlan, RoutingError> {
        (**self).route(request).await
    }
}
