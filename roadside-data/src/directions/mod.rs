//! Driving directions over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use roadside_core::{DirectionsProvider, RouteRequest};
//! use roadside_data::{HttpDirectionsProvider, HttpProviderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpProviderConfig::new("http://localhost:3000")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = HttpDirectionsProvider::with_config(config)?;
//! let origin = Coord { x: -97.74, y: 30.27 };
//! let destination = Coord { x: -96.80, y: 32.78 };
//! let route = provider
//!     .route(&RouteRequest::direct(origin, destination))
//!     .await?
//!     .into_primary()?;
//! println!("{}s", route.total_duration_secs());
//! # Ok(())
//! # }
//! ```

mod provider;
mod wire;

pub use provider::{DIRECTIONS_PATH, HttpDirectionsProvider};
