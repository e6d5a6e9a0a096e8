//! Server shared state
//!
//! Holds configuration and the nearby resolver (with its cache) for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::nearby::overpass::{OverpassBackend, PlacesBackend};
use crate::nearby::NearbyResolver;

/// Shared state for the HTTP server
pub struct AppState<B = OverpassBackend> {
    /// Configuration
    pub config: Config,

    /// Resolver shared by all requests
    pub resolver: NearbyResolver<B>,
}

impl AppState<OverpassBackend> {
    /// Create state backed by the configured Overpass interpreter
    pub fn new(config: Config) -> Result<Self> {
        let backend = OverpassBackend::new(&config.nearby.overpass_url)?;
        Ok(Self::with_backend(config, backend))
    }
}

impl<B: PlacesBackend> AppState<B> {
    /// Create state around any places backend
    pub fn with_backend(config: Config, backend: B) -> Self {
        let resolver = NearbyResolver::with_settings(backend, config.nearby.resolver_settings());
        Self { config, resolver }
    }
}
