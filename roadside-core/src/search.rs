//! Nearby place search.
//!
//! A [`PlaceSearchProvider`] answers "what is near this point" for one
//! sample point at a time. Results may be paginated through an opaque
//! continuation token.

use std::sync::Arc;

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::poi::{PointOfInterest, PriceLevel};

/// Smallest radius the search service accepts, in metres.
pub const MIN_RADIUS_M: u32 = 500;
/// Largest radius the search service accepts, in metres.
pub const MAX_RADIUS_M: u32 = 8_000;
/// Radius used when nothing else is configured.
pub const DEFAULT_RADIUS_M: u32 = 3_000;
/// Place type searched for by default.
pub const DEFAULT_PLACE_TYPE: &str = "restaurant";

/// Errors from [`PlaceSearchProvider::search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
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
    #[error("search service returned {status}: {message}")]
    Service {
        /// Service status code, e.g. `OVER_QUERY_LIMIT`.
        status: String,
        /// Optional explanation from the service.
        message: String,
    },
    /// The response body could not be understood.
    #[error("failed to parse search response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}

/// How far around the query point to look.
///
/// Ranking by distance and an explicit radius are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRange {
    /// Search within a radius in metres, clamped to
    /// [`MIN_RADIUS_M`]..=[`MAX_RADIUS_M`].
    Radius(u32),
    /// Let the service order by distance with its own cut-off.
    RankByDistance,
}

impl SearchRange {
    /// Clamped radius in metres, or `None` when ranking by distance.
    ///
    /// # Examples
    /// ```
    /// use roadside_core::SearchRange;
    ///
    /// assert_eq!(SearchRange::Radius(100).radius_m(), Some(500));
    /// assert_eq!(SearchRange::Radius(20_000).radius_m(), Some(8_000));
    /// assert_eq!(SearchRange::RankByDistance.radius_m(), None);
    /// ```
    pub fn radius_m(self) -> Option<u32> {
        match self {
            Self::Radius(radius) => Some(radius.clamp(MIN_RADIUS_M, MAX_RADIUS_M)),
            Self::RankByDistance => None,
        }
    }
}

impl Default for SearchRange {
    fn default() -> Self {
        Self::Radius(DEFAULT_RADIUS_M)
    }
}

/// A single nearby-search request.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    /// Centre of the search.
    pub location: Coord<f64>,
    /// Radius or distance ranking.
    pub range: SearchRange,
    /// Place type filter.
    pub place_type: String,
    /// Free-text keyword.
    pub keyword: Option<String>,
    /// Minimum price level, inclusive.
    pub min_price: Option<PriceLevel>,
    /// Maximum price level, inclusive.
    pub max_price: Option<PriceLevel>,
    /// Continuation token from a previous page.
    pub page_token: Option<String>,
}

impl NearbySearch {
    /// Search for the default place type around `location`.
    pub fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            range: SearchRange::default(),
            place_type: DEFAULT_PLACE_TYPE.to_owned(),
            keyword: None,
            min_price: None,
            max_price: None,
            page_token: None,
        }
    }

    /// Set the search range.
    #[must_use]
    pub fn with_range(mut self, range: SearchRange) -> Self {
        self.range = range;
        self
    }

    /// Set the place type.
    #[must_use]
    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }

    /// Set a keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Restrict results to an inclusive price range.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<PriceLevel>, max: Option<PriceLevel>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Continue a previous search.
    #[must_use]
    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// Places on this page. Records without coordinates are never present.
    pub results: Vec<PointOfInterest>,
    /// Token for the following page, when one exists.
    pub next_page_token: Option<String>,
}

impl SearchPage {
    /// A final page with the given results.
    pub fn new(results: Vec<PointOfInterest>) -> Self {
        Self {
            results,
            next_page_token: None,
        }
    }
}

/// Look up places near a point.
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    /// Return one page of results for `query`.
    async fn search(&self, query: &NearbySearch) -> Result<SearchPage, SearchError>;
}

#[async_trait]
impl<T> PlaceSearchProvider for Arc<T>
where
    T: PlaceSearchProvider + ?Sized,
{
    async fn search(&self, query: &NearbySearch) -> Result<SearchPage, SearchError> {
        (**self).search(query).await
    }
}

/// Per-trip search parameters applied at every sample point.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Place type filter.
    pub place_type: String,
    /// Radius or distance ranking.
    pub range: SearchRange,
    /// Optional keyword sent upstream.
    pub keyword: Option<String>,
    /// Optional minimum price sent upstream.
    pub min_price: Option<PriceLevel>,
    /// Optional maximum price sent upstream.
    pub max_price: Option<PriceLevel>,
    /// Pages to follow per sample point; at least one is always fetched.
    pub pages_per_sample: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            place_type: DEFAULT_PLACE_TYPE.to_owned(),
            range: SearchRange::default(),
            keyword: None,
            min_price: None,
            max_price: None,
            pages_per_sample: 1,
        }
    }
}

impl SearchConfig {
    /// Set the search range.
    #[must_use]
    pub fn with_range(mut self, range: SearchRange) -> Self {
        self.range = range;
        self
    }

    /// Set the upstream keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Set the upstream price bounds.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<PriceLevel>, max: Option<PriceLevel>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Set how many pages to follow per sample point.
    #[must_use]
    pub fn with_pages_per_sample(mut self, pages: usize) -> Self {
        self.pages_per_sample = pages;
        self
    }

    /// Build the first-page query for a sample point.
    pub fn query_at(&self, location: Coord<f64>) -> NearbySearch {
        let mut query = NearbySearch::new(location)
            .with_range(self.range)
            .with_place_type(self.place_type.clone())
            .with_price_range(self.min_price, self.max_price);
        query.keyword.clone_from(&self.keyword);
        query
    }
}
