//! Deterministic, in-memory providers used by unit and behaviour tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geo::Coord;

use crate::directions::{DirectionsProvider, RoutePlan, RouteRequest, RoutingError};
use crate::geometry::haversine_km;
use crate::poi::PointOfInterest;
use crate::polyline::Polyline;
use crate::route::{RouteGeometry, RouteLeg};
use crate::search::{
    MAX_RADIUS_M, NearbySearch, PlaceSearchProvider, SearchError, SearchPage,
};

/// Build a straight route from `from` to `to` through `segments` equal steps.
pub fn straight_route(from: Coord<f64>, to: Coord<f64>, segments: u32, duration_secs: u64) -> RouteGeometry {
    let steps = segments.max(1);
    let points = (0..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            Coord {
                x: from.x + t * (to.x - from.x),
                y: from.y + t * (to.y - from.y),
            }
        })
        .collect();
    RouteGeometry::new(
        Polyline::new(points),
        vec![RouteLeg {
            duration_secs,
            ..RouteLeg::default()
        }],
    )
}

/// Place search over a fixed list of points of interest.
///
/// Each query returns the points within its radius, in list order. Paging
/// splits results into pages of a fixed size with numeric tokens.
#[derive(Debug, Default)]
pub struct StaticPlaceSearch {
    pois: Vec<PointOfInterest>,
    page_size: Option<usize>,
    failing_calls: HashSet<usize>,
    calls: AtomicUsize,
    queries: Mutex<Vec<NearbySearch>>,
}

impl StaticPlaceSearch {
    /// Serve `pois`.
    pub fn with_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        Self {
            pois: pois.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Split results into pages of `size`.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Fail the zero-based `call` with a network error.
    #[must_use]
    pub fn failing_on(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }

    /// Number of searches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<NearbySearch> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PlaceSearchProvider for StaticPlaceSearch {
    async fn search(&self, query: &NearbySearch) -> Result<SearchPage, SearchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if self.failing_calls.contains(&call) {
            return Err(SearchError::Network {
                url: "memory://places".to_owned(),
                message: format!("scripted failure on call {call}"),
            });
        }

        let radius_km = f64::from(query.range.radius_m().unwrap_or(MAX_RADIUS_M)) / 1_000.0;
        let hits: Vec<_> = self
            .pois
            .iter()
            .filter(|poi| haversine_km(query.location, poi.location) <= radius_km)
            .cloned()
            .collect();

        let Some(size) = self.page_size else {
            return Ok(SearchPage::new(hits));
        };
        let start = match query.page_token.as_deref() {
            Some(token) => token.parse::<usize>().map_err(|err| SearchError::Parse {
                message: err.to_string(),
            })?,
            None => 0,
        };
        let end = (start + size).min(hits.len());
        Ok(SearchPage {
            results: hits.get(start..end).map(<[_]>::to_vec).unwrap_or_default(),
            next_page_token: (end < hits.len()).then(|| end.to_string()),
        })
    }
}

/// Directions service with scripted answers.
///
/// Requests without a waypoint receive the baseline. Requests through a
/// waypoint receive the scripted detour for that place id, or
/// [`RoutingError::NoRoute`] when none was scripted.
#[derive(Debug)]
pub struct ScriptedDirections {
    baseline: Result<RouteGeometry, RoutingError>,
    detours: HashMap<String, Result<RouteGeometry, RoutingError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<RouteRequest>>,
}

impl ScriptedDirections {
    /// Answer direct requests with `baseline`.
    pub fn with_baseline(baseline: RouteGeometry) -> Self {
        Self {
            baseline: Ok(baseline),
            detours: HashMap::new(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail direct requests with `error`.
    pub fn with_baseline_error(error: RoutingError) -> Self {
        Self {
            baseline: Err(error),
            ..Self::with_baseline(RouteGeometry::default())
        }
    }

    /// Answer detours through `place_id` with a single-leg route of `total_secs`.
    #[must_use]
    pub fn with_detour(mut self, place_id: impl Into<String>, total_secs: u64) -> Self {
        let route = RouteGeometry::new(
            Polyline::default(),
            vec![RouteLeg {
                duration_secs: total_secs,
                ..RouteLeg::default()
            }],
        );
        self.detours.insert(place_id.into(), Ok(route));
        self
    }

    /// Fail detours through `place_id` with `error`.
    #[must_use]
    pub fn with_detour_error(mut self, place_id: impl Into<String>, error: RoutingError) -> Self {
        self.detours.insert(place_id.into(), Err(error));
        self
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DirectionsProvider for ScriptedDirections {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePlan, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let answer = match request.waypoint.as_deref() {
            None => self.baseline.clone(),
            Some(id) => self
                .detours
                .get(id)
                .cloned()
                .unwrap_or(Err(RoutingError::NoRoute)),
        };
        answer.map(|route| RoutePlan::new(vec![route]))
    }
}
