//! Integration tests for [`HttpPlaceSearchProvider`] against a mock server.

use std::time::Duration;

use geo::Coord;
use roadside_core::{NearbySearch, PlaceSearchProvider, SearchError, SearchRange};
use roadside_data::{HttpPlaceSearchProvider, HttpProviderConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> NearbySearch {
    NearbySearch::new(Coord { x: -97.74, y: 30.27 }).with_range(SearchRange::Radius(2_000))
}

#[tokio::test]
async fn search_returns_places_with_locations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/places/nearby"))
        .and(query_param("radius", "2000"))
        .and(query_param("type", "restaurant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "next_page_token": "page-2",
            "results": [
                {
                    "place_id": "a",
                    "name": "Brisket Barn",
                    "geometry": {"location": {"lat": 30.28, "lng": -97.75}},
                    "types": ["restaurant"]
                },
                {"place_id": "b", "name": "No Geometry"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpPlaceSearchProvider::new(server.uri()).expect("provider should build");
    let page = provider.search(&query()).await.expect("search succeeds");

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].name, "Brisket Barn");
    assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
}

#[tokio::test]
async fn malformed_record_does_not_discard_its_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/places/nearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "good",
                    "name": "Pho Corner",
                    "geometry": {"location": {"lat": 30.28, "lng": -97.75}}
                },
                {"place_id": "half", "geometry": {"location": {"lat": 30.29}}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpPlaceSearchProvider::new(server.uri()).expect("provider should build");
    let page = provider.search(&query()).await.expect("search succeeds");

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "good");
}

#[tokio::test]
async fn page_token_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/places/nearby"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpPlaceSearchProvider::new(server.uri()).expect("provider should build");
    let page = provider
        .search(&query().with_page_token("page-2"))
        .await
        .expect("search succeeds");

    assert!(page.results.is_empty());
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn http_failure_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let provider = HttpPlaceSearchProvider::new(server.uri()).expect("provider should build");
    let err = provider.search(&query()).await.expect_err("should fail");

    assert!(matches!(err, SearchError::Http { status: 502, .. }));
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = HttpPlaceSearchProvider::new(server.uri()).expect("provider should build");
    let err = provider.search(&query()).await.expect_err("should fail");

    assert!(matches!(err, SearchError::Parse { .. }));
}

#[tokio::test]
async fn slow_service_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "OK", "results": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = HttpProviderConfig::new(server.uri()).with_timeout(Duration::from_millis(200));
    let provider = HttpPlaceSearchProvider::with_config(config).expect("provider should build");
    let err = provider.search(&query()).await.expect_err("should time out");

    assert!(matches!(err, SearchError::Timeout { .. }));
}
