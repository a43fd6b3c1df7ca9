#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Session lifecycle: validation, baseline failures, re-planning and views.

use geo::Coord;
use roadside_core::test_support::{ScriptedDirections, StaticPlaceSearch, straight_route};
use roadside_core::{
    ConfigError, CorridorWidth, Cuisine, GeoError, PointOfInterest, PriceLevel, ResultFilters,
    RouteGeometry, RoutingError,
};
use roadside_scorer::{DetourSession, PlanError, ScorerConfig, SessionConfig};
use rstest::{fixture, rstest};

const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const DESTINATION: Coord<f64> = Coord { x: 0.2, y: 0.0 };

type Session = DetourSession<StaticPlaceSearch, ScriptedDirections>;

fn priced(id: &str, name: &str, lng: f64, price: u8, category: &str) -> PointOfInterest {
    PointOfInterest::new(id, name, Coord { x: lng, y: 0.005 })
        .with_price_level(PriceLevel::new(price).expect("valid price"))
        .with_categories(["restaurant", category])
}

#[fixture]
fn session() -> Session {
    let pois = [
        priced("pizza", "Slice Stop", 0.02, 1, "pizza"),
        priced("sushi", "Sushi Bar", 0.1, 3, "japanese"),
        priced("grill", "Steak Grill", 0.18, 2, "steakhouse"),
    ];
    let directions =
        ScriptedDirections::with_baseline(straight_route(ORIGIN, DESTINATION, 10, 1_200))
            .with_detour("pizza", 1_260)
            .with_detour("sushi", 1_230)
            .with_detour("grill", 1_500);
    DetourSession::new(
        StaticPlaceSearch::with_pois(pois),
        directions,
        SessionConfig::default(),
    )
}

fn ranked_ids(session: &Session) -> Vec<String> {
    session
        .snapshot()
        .results
        .into_iter()
        .map(|result| result.poi.id)
        .collect()
}

#[rstest]
#[tokio::test]
async fn plan_reports_each_stage(session: Session) {
    let summary = session.plan(ORIGIN, DESTINATION).await.expect("plan");

    assert_eq!(summary.epoch, 1);
    assert_eq!(summary.baseline_secs, 1_200);
    assert!(summary.samples >= 2);
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.in_corridor, 3);
    assert_eq!(summary.selected, 3);
    assert_eq!(summary.pass.scored, 3);
    assert_eq!(ranked_ids(&session), ["sushi", "pizza", "grill"]);
    assert!(session.baseline().is_some());
}

#[rstest]
#[case(Coord { x: 0.0, y: 91.0 })]
#[case(Coord { x: f64::NAN, y: 0.0 })]
#[tokio::test]
async fn invalid_locations_are_rejected_before_any_request(
    session: Session,
    #[case] destination: Coord<f64>,
) {
    let err = session.plan(ORIGIN, destination).await.expect_err("invalid");

    assert!(matches!(
        err,
        PlanError::InvalidLocation(GeoError::OutOfRange { .. } | GeoError::NonFinite { .. })
    ));
    assert_eq!(session.snapshot().epoch, 0);
}

#[rstest]
#[tokio::test]
async fn zero_batch_size_is_a_config_error() {
    let session = DetourSession::new(
        StaticPlaceSearch::default(),
        ScriptedDirections::with_baseline(RouteGeometry::default()),
        SessionConfig::default().with_scorer(ScorerConfig::new(0)),
    );

    let err = session.plan(ORIGIN, DESTINATION).await.expect_err("invalid config");

    assert!(matches!(err, PlanError::InvalidConfig(ConfigError::ZeroBatchSize)));
}

#[rstest]
#[tokio::test]
async fn baseline_failure_is_returned_and_clears_progress() {
    let session = DetourSession::new(
        StaticPlaceSearch::default(),
        ScriptedDirections::with_baseline_error(RoutingError::NoRoute),
        SessionConfig::default(),
    );

    let err = session.plan(ORIGIN, DESTINATION).await.expect_err("no baseline");

    assert!(matches!(err, PlanError::Baseline(RoutingError::NoRoute)));
    let snapshot = session.snapshot();
    assert!(!snapshot.progress.in_progress);
    assert!(snapshot.results.is_empty());
    assert!(matches!(session.load_more().await, Err(PlanError::NoActiveTrip)));
}

#[rstest]
#[tokio::test]
async fn single_point_baseline_is_unusable() {
    let session = DetourSession::new(
        StaticPlaceSearch::default(),
        ScriptedDirections::with_baseline(RouteGeometry::default()),
        SessionConfig::default(),
    );

    let err = session.plan(ORIGIN, DESTINATION).await.expect_err("unusable");

    assert!(matches!(err, PlanError::UnusableBaseline(_)));
}

#[rstest]
#[tokio::test]
async fn settings_changes_before_planning_do_nothing(session: Session) {
    let width = CorridorWidth::from_miles(1.0).expect("valid width");

    assert!(session.set_corridor_width(width).await.expect("no trip").is_none());
    assert!(session.set_sample_spacing(4.0).await.expect("no trip").is_none());
    assert_eq!(session.config().corridor.width, width);
    assert_eq!(session.snapshot().epoch, 0);
}

#[rstest]
#[tokio::test]
async fn changing_width_replans_under_a_new_epoch(session: Session) {
    session.plan(ORIGIN, DESTINATION).await.expect("plan");
    let narrow = CorridorWidth::from_miles(1.0).expect("valid width");

    let replanned = session
        .set_corridor_width(narrow)
        .await
        .expect("replan")
        .expect("trip exists");

    assert_eq!(replanned.epoch, 2);
    assert_eq!(session.snapshot().epoch, 2);
    assert_eq!(replanned.pass.scored, 3);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::INFINITY)]
#[tokio::test]
async fn invalid_spacing_leaves_config_untouched(session: Session, #[case] km: f64) {
    let before = session.config();

    let err = session.set_sample_spacing(km).await.expect_err("invalid spacing");

    assert!(matches!(err, PlanError::InvalidConfig(ConfigError::InvalidSpacing { .. })));
    assert_eq!(session.config(), before);
}

#[rstest]
#[tokio::test]
async fn views_filter_without_reordering(session: Session) {
    session.plan(ORIGIN, DESTINATION).await.expect("plan");
    let max_two = Some(PriceLevel::new(2).expect("valid price"));

    let cheap = session.view(&ResultFilters::default().with_price_range(None, max_two));
    let steak = session.view(&ResultFilters::default().with_keyword("steak"));

    let cheap_ids: Vec<_> = cheap.results.iter().map(|r| r.poi.id.as_str()).collect();
    assert_eq!(cheap_ids, ["pizza", "grill"]);
    assert_eq!(cheap.count_for(Cuisine::Japanese), 0);
    assert_eq!(cheap.count_for(Cuisine::Pizza), 1);
    assert_eq!(steak.results.len(), 1);
    assert_eq!(steak.count_for(Cuisine::Japanese), 1);
}

#[rstest]
#[tokio::test]
async fn subscribers_observe_the_final_ranking(session: Session) {
    let mut updates = session.subscribe();

    session.plan(ORIGIN, DESTINATION).await.expect("plan");

    assert!(updates.has_changed().expect("board alive"));
    let latest = updates.borrow_and_update().clone();
    assert_eq!(latest, session.snapshot());
    assert_eq!(latest.results.len(), 3);
}
