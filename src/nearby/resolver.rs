//! Nearby place resolver
//!
//! Validates the request, then goes through the shared cache to the upstream:
//! build query, fetch under a timeout, sanitize, measure, sort, truncate.

use crate::constants::cache::NEARBY_TTL_SECS;
use crate::constants::nearby::{MAX_RESULTS, UPSTREAM_TIMEOUT_SECS};
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::nearby::cache::RequestCache;
use crate::nearby::overpass::PlacesBackend;
use crate::nearby::query::build_overpass_query;
use crate::nearby::sanitize::sanitize_element;
use crate::nearby::{NearbyQuery, NearbyResult, PlaceRecord, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Tunables for a resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverSettings {
    /// Upstream request timeout
    pub timeout: Duration,
    /// Lifetime of a cached result
    pub cache_ttl: Duration,
    /// Places returned per search
    pub max_results: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(UPSTREAM_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(NEARBY_TTL_SECS),
            max_results: MAX_RESULTS,
        }
    }
}

/// Finds places near a point, sharing upstream calls between identical requests
pub struct NearbyResolver<B> {
    backend: Arc<B>,
    cache: RequestCache<Arc<Vec<PlaceRecord>>>,
    settings: ResolverSettings,
}

impl<B: PlacesBackend> NearbyResolver<B> {
    /// Create a resolver with default settings
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, ResolverSettings::default())
    }

    /// Create a resolver with explicit settings and an empty cache
    pub fn with_settings(backend: B, settings: ResolverSettings) -> Self {
        Self {
            backend: Arc::new(backend),
            cache: RequestCache::new(settings.cache_ttl),
            settings,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Find places of `category` around `point`
    ///
    /// Unknown categories and invalid points are rejected before any cache
    /// or network work. The radius override is clamped into range.
    pub async fn find_nearby(
        &self,
        category: &str,
        point: GeoPoint,
        radius_override: Option<f64>,
    ) -> Result<NearbyResult> {
        let query = NearbyQuery::parse(category, point, radius_override)?;
        self.resolve(query).await
    }

    /// Resolve an already validated query
    pub async fn resolve(&self, query: NearbyQuery) -> Result<NearbyResult> {
        let key = query.cache_key();

        let backend = Arc::clone(&self.backend);
        let settings = self.settings;
        let items = self
            .cache
            .resolve(&key, move || fetch_places(backend, query, settings))
            .await?;

        Ok(NearbyResult {
            category: query.category,
            lat: query.point.lat,
            lon: query.point.lon,
            radius: query.radius_meters,
            items: items.to_vec(),
        })
    }
}

/// One upstream round trip, finalized into a sorted, truncated list
async fn fetch_places<B: PlacesBackend>(
    backend: Arc<B>,
    query: NearbyQuery,
    settings: ResolverSettings,
) -> std::result::Result<Arc<Vec<PlaceRecord>>, UpstreamError> {
    let text = build_overpass_query(query.category, query.point, query.radius_meters);

    let response = match tokio::time::timeout(settings.timeout, backend.fetch(text)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(category = %query.category, "Nearby provider failed: {:?}", e);
            return Err(e);
        }
        Err(_) => {
            warn!(category = %query.category, "Nearby provider timed out");
            return Err(UpstreamError::Timeout(settings.timeout.as_secs()));
        }
    };

    let received = response.elements.len();
    let mut places: Vec<PlaceRecord> = response
        .elements
        .iter()
        .filter_map(|element| sanitize_element(element, query.category))
        .map(|place| place.into_record(query.point))
        .collect();

    places.sort_by_key(|place| place.distance_meters);
    places.truncate(settings.max_results);

    info!(
        category = %query.category,
        radius = query.radius_meters,
        "Fetched {} places ({} upstream elements)",
        places.len(),
        received
    );

    Ok(Arc::new(places))
}
