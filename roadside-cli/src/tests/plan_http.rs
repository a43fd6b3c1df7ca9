//! End-to-end `plan` runs against mock collaborator services.

use super::*;
use crate::plan::{PlanArgs, PlanConfig, execute_plan, write_report};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENCODED_ROUTE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

fn route_body(total_secs: u64) -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "overview_polyline": {"points": ENCODED_ROUTE},
            "legs": [{
                "duration": {"value": total_secs},
                "distance": {"value": 800_000},
                "steps": []
            }]
        }]
    })
}

fn place(id: &str, name: &str, (lat, lng): (f64, f64), types: &[&str]) -> Value {
    json!({
        "place_id": id,
        "name": name,
        "geometry": {"location": {"lat": lat, "lng": lng}},
        "types": types,
        "vicinity": "1 Main St"
    })
}

fn no_route() -> Value {
    json!({"status": "ZERO_RESULTS", "routes": []})
}

async fn mock_services() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/places/nearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                place("diner-7", "Gold Rush Diner", (38.5, -120.2), &["restaurant", "food"]),
                place("pizza-3", "Sierra Pizza", (40.7, -120.95), &["restaurant", "pizza"]),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/directions"))
        .and(query_param("waypoint", "diner-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1_500)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/directions"))
        .and(query_param("waypoint", "pizza-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(no_route()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/directions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body(1_200)))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> PlanConfig {
    PlanConfig::try_from(PlanArgs {
        origin: Some("38.5,-120.2".to_owned()),
        destination: Some("43.252,-126.453".to_owned()),
        base_url: Some(server.uri()),
        ..PlanArgs::default()
    })
    .expect("config should build")
}

#[tokio::test]
async fn plan_ranks_routable_detours() {
    let server = mock_services().await;

    let report = execute_plan(&config_for(&server)).await.expect("plan runs");

    assert_eq!(report.baseline_secs, 1_200);
    assert_eq!(report.samples, 3);
    assert_eq!(report.discovered, 2);
    assert_eq!(report.scored, 1);
    assert_eq!(report.failed, 1);
    let ids: Vec<_> = report.view.results.iter().map(|r| r.poi.id.as_str()).collect();
    assert_eq!(ids, ["diner-7"]);
    assert_eq!(report.view.results[0].added_time_secs, 300);
    assert!(!report.progress.in_progress);
}

#[tokio::test]
async fn report_serialises_view_fields_at_top_level() {
    let server = mock_services().await;
    let mut config = config_for(&server);
    config.filters = config.filters.with_keyword("pizza");

    let report = execute_plan(&config).await.expect("plan runs");
    let mut buffer = Vec::new();
    write_report(&mut buffer, &report).expect("report writes");
    let parsed: Value = serde_json::from_slice(&buffer).expect("valid JSON");

    assert_eq!(parsed["results"], json!([]));
    assert_eq!(parsed["scored"], 1);
    assert!(parsed["cuisine_counts"].as_array().is_some_and(|counts| !counts.is_empty()));
}

#[tokio::test]
async fn unreachable_baseline_surfaces_plan_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/directions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(no_route()))
        .mount(&server)
        .await;

    let err = execute_plan(&config_for(&server))
        .await
        .expect_err("no baseline route");
    match err {
        CliError::Plan(roadside_scorer::PlanError::Baseline(_)) => {}
        other => panic!("expected baseline failure, found {other:?}"),
    }
}
