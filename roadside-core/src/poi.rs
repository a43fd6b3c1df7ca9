//! Points of interest discovered along a route.

use std::collections::BTreeSet;
use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Highest price level reported by place search services.
pub const MAX_PRICE_LEVEL: u8 = 4;

/// Error returned by [`PriceLevel::new`] for values above [`MAX_PRICE_LEVEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price level {0} is outside 0..={MAX_PRICE_LEVEL}")]
pub struct PriceLevelError(pub u8);

/// Relative price on the `0..=4` scale used by place search services.
///
/// # Examples
/// ```
/// use roadside_core::PriceLevel;
///
/// let level = PriceLevel::new(2)?;
/// assert_eq!(level.get(), 2);
/// assert!(PriceLevel::new(5).is_err());
/// # Ok::<(), roadside_core::PriceLevelError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriceLevel(u8);

impl PriceLevel {
    /// Validate and wrap a raw price level.
    pub const fn new(level: u8) -> Result<Self, PriceLevelError> {
        if level > MAX_PRICE_LEVEL {
            return Err(PriceLevelError(level));
        }
        Ok(Self(level))
    }

    /// Return the raw level.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PriceLevel {
    type Error = PriceLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceLevel> for u8 {
    fn from(level: PriceLevel) -> Self {
        level.0
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A place that could be visited on the way to a destination.
///
/// Identity is the provider-assigned `id`; aggregation and result sets are
/// keyed on it. Coordinates are WGS84 with `x = longitude` and
/// `y = latitude`. `raw` carries provider attributes the engine does not
/// interpret.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadside_core::{PointOfInterest, PriceLevel};
///
/// let poi = PointOfInterest::new("abc", "Luigi's", Coord { x: -75.1, y: 40.0 })
///     .with_price_level(PriceLevel::new(2)?)
///     .with_categories(["restaurant", "meal_takeaway"]);
///
/// assert_eq!(poi.id, "abc");
/// assert!(poi.matches_keyword("PIZZA") == false);
/// assert!(poi.matches_keyword("luigi"));
/// # Ok::<(), roadside_core::PriceLevelError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Unique provider identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Relative price, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<PriceLevel>,
    /// Average user rating, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Category tags such as `restaurant` or `cafe`.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Short street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Provider attributes passed through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub raw: Map<String, Value>,
}

impl PointOfInterest {
    /// Construct a point of interest with no optional attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            price_level: None,
            rating: None,
            categories: BTreeSet::new(),
            address: None,
            raw: Map::new(),
        }
    }

    /// Set the price level.
    #[must_use]
    pub fn with_price_level(mut self, level: PriceLevel) -> Self {
        self.price_level = Some(level);
        self
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Replace the category tags.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach an opaque provider attribute.
    #[must_use]
    pub fn with_raw(mut self, key: impl Into<String>, value: Value) -> Self {
        self.raw.insert(key.into(), value);
        self
    }

    /// Case-insensitive substring match against the name or any category.
    ///
    /// Underscores in category tags are treated as spaces so `fast food`
    /// matches a `fast_food` tag. A blank keyword matches everything.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        if self.name.to_lowercase().contains(&needle) {
            return true;
        }
        self.categories.iter().any(|category| {
            let tag = category.to_lowercase();
            tag.contains(&needle) || tag.replace('_', " ").contains(&needle)
        })
    }
}
