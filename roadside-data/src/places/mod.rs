//! Nearby place search over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use roadside_core::{NearbySearch, PlaceSearchProvider};
//! use roadside_data::places::HttpPlaceSearchProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpPlaceSearchProvider::new("http://localhost:3000")?;
//! let page = provider
//!     .search(&NearbySearch::new(Coord { x: -97.74, y: 30.27 }).with_keyword("tacos"))
//!     .await?;
//! println!("{} places", page.results.len());
//! # Ok(())
//! # }
//! ```

mod provider;
mod wire;

pub use provider::{HttpPlaceSearchProvider, NEARBY_PATH};
