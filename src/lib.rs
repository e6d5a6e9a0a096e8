//! emergency-nearby: nearby emergency places from OpenStreetMap
//!
//! A library, CLI and HTTP API for finding hospitals and diplomatic offices
//! (embassies, consulates) around a point, using the Overpass API.
//!
//! ## Features
//!
//! - Overpass query generation for hospitals and diplomatic offices
//! - Sanitized, distance-sorted results (haversine)
//! - TTL cache with sharing of concurrent identical requests
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```no_run
//! use emergency_nearby::geo::GeoPoint;
//! use emergency_nearby::nearby::overpass::OverpassBackend;
//! use emergency_nearby::nearby::NearbyResolver;
//!
//! # async fn demo() -> emergency_nearby::Result<()> {
//! let backend = OverpassBackend::new("https://overpass-api.de/api/interpreter")?;
//! let resolver = NearbyResolver::new(backend);
//!
//! let london = GeoPoint::new(51.5074, -0.1278);
//! let result = resolver.find_nearby("hospitals", london, Some(5000.0)).await?;
//! for place in &result.items {
//!     println!("{} ({} m)", place.name, place.distance_meters);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod nearby;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::GeoPoint;
pub use nearby::{Category, NearbyQuery, NearbyResolver, NearbyResult, PlaceRecord};
