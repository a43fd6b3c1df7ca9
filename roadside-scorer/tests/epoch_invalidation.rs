#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! A pass that settles after a newer trip started must not leak into it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use geo::Coord;
use roadside_core::test_support::{StaticPlaceSearch, straight_route};
use roadside_core::{
    DirectionsProvider, PointOfInterest, RouteGeometry, RouteLeg, RoutePlan, RouteRequest,
    RoutingError, SearchConfig, SearchRange,
};
use roadside_scorer::{DetourSession, SessionConfig};
use tokio::sync::Semaphore;

const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const EAST: Coord<f64> = Coord { x: 0.5, y: 0.0 };
const NORTH: Coord<f64> = Coord { x: 0.0, y: 0.5 };

/// Directions that hold detours through gated places until released.
struct GatedDirections {
    baselines: Vec<(Coord<f64>, RouteGeometry)>,
    detours: HashMap<String, u64>,
    gated: HashSet<String>,
    gate: Semaphore,
    entered: Semaphore,
}

impl GatedDirections {
    fn release(&self) {
        self.gate.add_permits(self.gated.len());
    }
}

#[async_trait]
impl DirectionsProvider for GatedDirections {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePlan, RoutingError> {
        let Some(id) = request.waypoint.as_deref() else {
            return self
                .baselines
                .iter()
                .find(|(destination, _)| *destination == request.destination)
                .map(|(_, route)| RoutePlan::new(vec![route.clone()]))
                .ok_or(RoutingError::NoRoute);
        };
        if self.gated.contains(id) {
            self.entered.add_permits(1);
            let _permit = self.gate.acquire().await.expect("gate stays open");
        }
        let secs = self.detours.get(id).copied().ok_or(RoutingError::NoRoute)?;
        Ok(RoutePlan::new(vec![RouteGeometry::new(
            Default::default(),
            vec![RouteLeg {
                duration_secs: secs,
                ..RouteLeg::default()
            }],
        )]))
    }
}

fn poi(id: &str, lng: f64, lat: f64) -> PointOfInterest {
    PointOfInterest::new(id, id, Coord { x: lng, y: lat })
}

#[tokio::test]
async fn stale_pass_results_never_reach_the_new_trip() {
    let east_ids = ["east-1", "east-2"];
    let north_ids = ["north-1", "north-2"];
    let directions = Arc::new(GatedDirections {
        baselines: vec![
            (EAST, straight_route(ORIGIN, EAST, 20, 3_000)),
            (NORTH, straight_route(ORIGIN, NORTH, 20, 3_100)),
        ],
        detours: east_ids
            .iter()
            .chain(north_ids.iter())
            .map(|id| ((*id).to_owned(), 3_300))
            .collect(),
        gated: east_ids.iter().map(|id| (*id).to_owned()).collect(),
        gate: Semaphore::new(0),
        entered: Semaphore::new(0),
    });
    let search = StaticPlaceSearch::with_pois([
        poi("east-1", 0.25, 0.005),
        poi("east-2", 0.4, 0.005),
        poi("north-1", 0.005, 0.25),
        poi("north-2", 0.005, 0.4),
    ]);
    let config = SessionConfig::default()
        .with_search(SearchConfig::default().with_range(SearchRange::Radius(8_000)));
    let session = DetourSession::new(search, Arc::clone(&directions), config);

    let (first, second) = tokio::join!(session.plan(ORIGIN, EAST), async {
        directions
            .entered
            .acquire()
            .await
            .expect("first trip reaches scoring")
            .forget();
        let second = session.plan(ORIGIN, NORTH).await;
        directions.release();
        second
    });

    let first = first.expect("first plan returns");
    let second = second.expect("second plan returns");
    assert_eq!(first.epoch, 1);
    assert!(first.pass.cancelled);
    assert_eq!(first.pass.discarded, 2);
    assert_eq!(first.pass.scored, 0);
    assert_eq!(second.epoch, 2);
    assert_eq!(second.pass.scored, 2);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.epoch, 2);
    let mut ids: Vec<_> = snapshot.results.iter().map(|r| r.poi.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, north_ids);
    assert!(snapshot.results.iter().all(|r| r.added_time_secs == 200));
    assert!(!snapshot.progress.in_progress);
    assert_eq!(snapshot.progress.completed_count, 2);
}

#[tokio::test]
async fn load_more_after_a_superseded_trip_uses_the_new_one() {
    let directions = Arc::new(GatedDirections {
        baselines: vec![(NORTH, straight_route(ORIGIN, NORTH, 20, 3_100))],
        detours: HashMap::from([("north-1".to_owned(), 3_100)]),
        gated: HashSet::new(),
        gate: Semaphore::new(0),
        entered: Semaphore::new(0),
    });
    let session = DetourSession::new(
        StaticPlaceSearch::with_pois([poi("north-1", 0.005, 0.25)]),
        directions,
        SessionConfig::default()
            .with_search(SearchConfig::default().with_range(SearchRange::Radius(8_000))),
    );

    let failed = session.plan(ORIGIN, EAST).await;
    assert!(failed.is_err());
    session.plan(ORIGIN, NORTH).await.expect("north trip plans");

    let more = session.load_more().await.expect("north trip is active");
    assert_eq!(more.queued, 0);
    assert_eq!(session.snapshot().results.len(), 1);
}
