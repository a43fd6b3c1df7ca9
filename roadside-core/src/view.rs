//! Filtered presentation of the ranked results.
//!
//! Filtering never re-queries a provider and never changes the ranking
//! order; it only hides results.

use serde::{Deserialize, Serialize};

use crate::cuisine::Cuisine;
use crate::detour::DetourResult;
use crate::poi::{PointOfInterest, PriceLevel};

/// User-adjustable display filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFilters {
    /// Case-insensitive substring matched against name or categories.
    pub keyword: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<PriceLevel>,
    /// Inclusive upper price bound.
    pub max_price: Option<PriceLevel>,
}

impl ResultFilters {
    /// Set the keyword filter.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Set the inclusive price bounds.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<PriceLevel>, max: Option<PriceLevel>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Whether any price bound is set.
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Price rule: unknown prices pass only when no bound is set.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use roadside_core::{PointOfInterest, PriceLevel, ResultFilters};
    ///
    /// let unpriced = PointOfInterest::new("a", "A", Coord { x: 0.0, y: 0.0 });
    /// assert!(ResultFilters::default().admits_price(&unpriced));
    ///
    /// let bounded = ResultFilters::default().with_price_range(None, Some(PriceLevel::new(2)?));
    /// assert!(!bounded.admits_price(&unpriced));
    /// # Ok::<(), roadside_core::PriceLevelError>(())
    /// ```
    pub fn admits_price(&self, poi: &PointOfInterest) -> bool {
        let Some(level) = poi.price_level else {
            return !self.has_price_bounds();
        };
        self.min_price.is_none_or(|min| level >= min) && self.max_price.is_none_or(|max| level <= max)
    }

    /// Keyword rule; an absent or blank keyword admits everything.
    pub fn admits_keyword(&self, poi: &PointOfInterest) -> bool {
        self.keyword
            .as_deref()
            .is_none_or(|keyword| poi.matches_keyword(keyword))
    }
}

/// Live count of price-filtered results matching one cuisine keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineCount {
    /// The cuisine keyword.
    #[serde(with = "cuisine_name")]
    pub cuisine: Cuisine,
    /// Matching results after the price filter.
    pub count: usize,
}

/// What the user sees for the current filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    /// Results passing every filter, in ranking order.
    pub results: Vec<DetourResult>,
    /// Per-cuisine counts over the price-filtered results.
    pub cuisine_counts: Vec<CuisineCount>,
}

impl ResultView {
    /// Derive the view from ranked results.
    ///
    /// `ranked` must already be in ranking order; the order is preserved.
    pub fn derive(ranked: &[DetourResult], filters: &ResultFilters) -> Self {
        let priced: Vec<&DetourResult> = ranked
            .iter()
            .filter(|result| filters.admits_price(&result.poi))
            .collect();

        let cuisine_counts = Cuisine::ALL
            .into_iter()
            .map(|cuisine| CuisineCount {
                cuisine,
                count: priced
                    .iter()
                    .filter(|result| result.poi.matches_keyword(cuisine.as_str()))
                    .count(),
            })
            .collect();

        let results = priced
            .into_iter()
            .filter(|result| filters.admits_keyword(&result.poi))
            .cloned()
            .collect();

        Self {
            results,
            cuisine_counts,
        }
    }

    /// Count for one cuisine.
    pub fn count_for(&self, cuisine: Cuisine) -> usize {
        self.cuisine_counts
            .iter()
            .find(|entry| entry.cuisine == cuisine)
            .map_or(0, |entry| entry.count)
    }
}

mod cuisine_name {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use crate::cuisine::Cuisine;

    pub(super) fn serialize<S: Serializer>(cuisine: &Cuisine, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(cuisine.as_str())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cuisine, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
