//! HTTP-based [`DirectionsProvider`].

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use roadside_core::{DirectionsProvider, RoutePlan, RouteRequest, RoutingError};
use url::Url;

use super::wire::{DirectionsResponse, into_plan};
use crate::http::{Failure, HttpProviderConfig, ProviderBuildError, classify, lat_lng};

/// Path of the directions endpoint beneath the base URL.
pub const DIRECTIONS_PATH: &str = "api/directions";

/// Directions against the collaborator's directions endpoint.
///
/// Query parameters are `origin` and `destination` as `"lat,lng"` plus an
/// optional `waypoint` carrying the place id.
#[derive(Debug, Clone)]
pub struct HttpDirectionsProvider {
    client: Client,
    config: HttpProviderConfig,
    endpoint: Url,
}

impl HttpDirectionsProvider {
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
        let endpoint = config.endpoint(DIRECTIONS_PATH)?;
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn build_url(&self, request: &RouteRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("origin", &lat_lng(request.origin))
                .append_pair("destination", &lat_lng(request.destination));
            if let Some(place_id) = request.waypoint.as_deref() {
                pairs.append_pair("waypoint", place_id);
            }
        }
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> RoutingError {
        let url = url.to_string();
        match classify(error, self.config.timeout) {
            Failure::Timeout { timeout_secs } => RoutingError::Timeout { url, timeout_secs },
            Failure::Status { status } => RoutingError::Http {
                url,
                status,
                message: error.to_string(),
            },
            Failure::Network => RoutingError::Network {
                url,
                message: error.to_string(),
            },
        }
    }

    fn convert_response(response: DirectionsResponse) -> Result<RoutePlan, RoutingError> {
        if response.is_no_route() {
            return Err(RoutingError::NoRoute);
        }
        if !response.is_ok() {
            return Err(RoutingError::Service {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
        let plan = into_plan(response.routes).map_err(|err| RoutingError::Parse {
            message: err.to_string(),
        })?;
        if plan.routes.is_empty() {
            return Err(RoutingError::NoRoute);
        }
        Ok(plan)
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePlan, RoutingError> {
        let url = self.build_url(request);
        debug!("GET {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let body: DirectionsResponse = response.json().await.map_err(|err| RoutingError::Parse {
            message: err.to_string(),
        })?;

        Self::convert_response(body)
    }
}
