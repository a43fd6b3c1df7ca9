//! HTTP-based [`PlaceSearchProvider`].

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use roadside_core::{NearbySearch, PlaceSearchProvider, SearchError, SearchPage};
use url::Url;

use super::wire::{NearbyResponse, into_pois};
use crate::http::{Failure, HttpProviderConfig, ProviderBuildError, classify, lat_lng};

/// Path of the nearby search endpoint beneath the base URL.
pub const NEARBY_PATH: &str = "api/places/nearby";

/// Place search against the collaborator's nearby endpoint.
///
/// Query parameters are `lat`, `lng`, either `radius` or `rankby=distance`,
/// `type`, and the optional `keyword`, `minPrice`, `maxPrice` and
/// `pageToken`.
#[derive(Debug, Clone)]
pub struct HttpPlaceSearchProvider {
    client: Client,
    config: HttpProviderConfig,
    endpoint: Url,
}

impl HttpPlaceSearchProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = config.endpoint(NEARBY_PATH)?;
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn build_url(&self, query: &NearbySearch) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("lat", &query.location.y.to_string())
                .append_pair("lng", &query.location.x.to_string());
            match query.range.radius_m() {
                Some(radius) => pairs.append_pair("radius", &radius.to_string()),
                None => pairs.append_pair("rankby", "distance"),
            };
            pairs.append_pair("type", &query.place_type);
            if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
                pairs.append_pair("keyword", keyword);
            }
            if let Some(min) = query.min_price {
                pairs.append_pair("minPrice", &min.to_string());
            }
            if let Some(max) = query.max_price {
                pairs.append_pair("maxPrice", &max.to_string());
            }
            if let Some(token) = query.page_token.as_deref() {
                pairs.append_pair("pageToken", token);
            }
        }
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> SearchError {
        let url = url.to_string();
        match classify(error, self.config.timeout) {
            Failure::Timeout { timeout_secs } => SearchError::Timeout { url, timeout_secs },
            Failure::Status { status } => SearchError::Http {
                url,
                status,
                message: error.to_string(),
            },
            Failure::Network => SearchError::Network {
                url,
                message: error.to_string(),
            },
        }
    }

    fn convert_response(response: NearbyResponse) -> Result<SearchPage, SearchError> {
        if !response.is_ok() {
            return Err(SearchError::Service {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }

        Ok(SearchPage {
            results: into_pois(response.results),
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }
}

#[async_trait]
impl PlaceSearchProvider for HttpPlaceSearchProvider {
    async fn search(&self, query: &NearbySearch) -> Result<SearchPage, SearchError> {
        let url = self.build_url(query);
        debug!("GET {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let body: NearbyResponse = response.json().await.map_err(|err| SearchError::Parse {
            message: err.to_string(),
        })?;

        Self::convert_response(body).inspect_err(|err| warn!("place search failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use roadside_core::{PriceLevel, SearchRange};
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    #[fixture]
    fn provider() -> HttpPlaceSearchProvider {
        HttpPlaceSearchProvider::new("http://places.example.com").expect("provider should build")
    }

    fn params(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[rstest]
    fn build_url_uses_radius_and_type(provider: HttpPlaceSearchProvider) {
        let query = NearbySearch::new(Coord { x: -97.5, y: 30.25 });

        let url = provider.build_url(&query);

        assert_eq!(url.path(), "/api/places/nearby");
        let params = params(&url);
        assert_eq!(params["lat"], "30.25");
        assert_eq!(params["lng"], "-97.5");
        assert_eq!(params["radius"], "3000");
        assert_eq!(params["type"], "restaurant");
        assert!(!params.contains_key("rankby"));
        assert!(!params.contains_key("keyword"));
    }

    #[rstest]
    fn build_url_ranks_by_distance_without_radius(provider: HttpPlaceSearchProvider) {
        let query = NearbySearch::new(Coord { x: 0.0, y: 0.0 })
            .with_range(SearchRange::RankByDistance)
            .with_keyword("thai food")
            .with_price_range(PriceLevel::new(1).ok(), PriceLevel::new(3).ok())
            .with_page_token("next");

        let params = params(&provider.build_url(&query));

        assert_eq!(params["rankby"], "distance");
        assert!(!params.contains_key("radius"));
        assert_eq!(params["keyword"], "thai food");
        assert_eq!(params["minPrice"], "1");
        assert_eq!(params["maxPrice"], "3");
        assert_eq!(params["pageToken"], "next");
    }

    #[rstest]
    fn build_url_clamps_radius(provider: HttpPlaceSearchProvider) {
        let query = NearbySearch::new(Coord { x: 0.0, y: 0.0 }).with_range(SearchRange::Radius(50_000));
        assert_eq!(params(&provider.build_url(&query))["radius"], "8000");
    }

    #[rstest]
    fn zero_results_is_an_empty_page() {
        let response = NearbyResponse {
            status: "ZERO_RESULTS".to_owned(),
            error_message: None,
            results: Vec::new(),
            next_page_token: Some(String::new()),
        };

        let page = HttpPlaceSearchProvider::convert_response(response).expect("should parse");

        assert!(page.results.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[rstest]
    fn service_failure_is_reported() {
        let response = NearbyResponse {
            status: "REQUEST_DENIED".to_owned(),
            error_message: Some("bad key".to_owned()),
            results: Vec::new(),
            next_page_token: None,
        };

        let err = HttpPlaceSearchProvider::convert_response(response).expect_err("should fail");

        assert_eq!(
            err,
            SearchError::Service {
                status: "REQUEST_DENIED".to_owned(),
                message: "bad key".to_owned(),
            }
        );
    }
}
