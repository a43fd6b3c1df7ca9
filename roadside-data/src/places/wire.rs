//! Nearby search response types.

use log::debug;
use roadside_core::{PointOfInterest, PriceLevel};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::wire::{LatLng, STATUS_OK, STATUS_ZERO_RESULTS};

/// Nearby search response.
#[derive(Debug, Deserialize)]
pub(crate) struct NearbyResponse {
    /// Status code, e.g. `"OK"`, `"ZERO_RESULTS"`, `"INVALID_REQUEST"`.
    pub status: String,
    /// Optional explanation when `status` is a failure.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Raw records, converted one at a time by [`into_pois`].
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default, alias = "nextPageToken")]
    pub next_page_token: Option<String>,
}

impl NearbyResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK || self.status == STATUS_ZERO_RESULTS
    }
}

/// One place as returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaceRecord {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    /// Everything else, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

impl PlaceRecord {
    /// Convert into a point of interest; `None` when the record has no
    /// location.
    pub fn into_poi(self) -> Option<PointOfInterest> {
        let location = self.geometry.and_then(|geometry| geometry.location)?;
        let mut poi = PointOfInterest::new(self.place_id, self.name, location.into())
            .with_categories(self.types);
        poi.rating = self.rating;
        poi.address = self.vicinity;
        poi.raw = self.extra;
        if let Some(raw) = self.price_level {
            match PriceLevel::new(raw) {
                Ok(level) => poi.price_level = Some(level),
                Err(err) => debug!("ignoring price for {}: {err}", poi.id),
            }
        }
        Some(poi)
    }
}

/// Convert raw records, dropping any without an id or a full location.
///
/// A bad record never costs the rest of the page.
pub(crate) fn into_pois(records: Vec<Value>) -> Vec<PointOfInterest> {
    records
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<PlaceRecord>(value) {
            Ok(record) => {
                let id = record.place_id.clone();
                let poi = record.into_poi();
                if poi.is_none() {
                    debug!("dropping place {id} without a location");
                }
                poi
            }
            Err(err) => {
                debug!("dropping malformed place record: {err}");
                None
            }
        })
        .collect()
}
