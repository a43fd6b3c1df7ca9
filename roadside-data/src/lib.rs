//! HTTP adapters for the place search and directions services.
//!
//! Both services are thin pass-throughs to an upstream mapping provider and
//! speak a Google-style JSON dialect: a `status` string plus a payload.
//! [`places::HttpPlaceSearchProvider`] implements
//! [`roadside_core::PlaceSearchProvider`] and
//! [`directions::HttpDirectionsProvider`] implements
//! [`roadside_core::DirectionsProvider`].

pub mod directions;
pub mod http;
pub mod places;
mod wire;

pub use directions::HttpDirectionsProvider;
pub use http::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
pub use places::HttpPlaceSearchProvider;
