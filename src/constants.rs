//! Centralized constants for the emergency-nearby crate
//!
//! Values shared by the resolver, the config defaults and the HTTP layer.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// External API endpoints
pub mod api {
    /// Public Overpass interpreter endpoint
    pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User-Agent sent to OpenStreetMap services
    pub const USER_AGENT: &str = concat!("emergency-nearby/", env!("CARGO_PKG_VERSION"));
}

/// Nearby search limits
pub mod nearby {
    /// Smallest accepted search radius in meters
    pub const MIN_RADIUS_METERS: u32 = 500;

    /// Largest accepted search radius in meters
    pub const MAX_RADIUS_METERS: u32 = 50_000;

    /// Default radius for hospital searches
    pub const HOSPITALS_RADIUS_METERS: u32 = 10_000;

    /// Default radius for embassy/consulate searches
    pub const DIPLOMATIC_RADIUS_METERS: u32 = 20_000;

    /// Number of places returned per search
    pub const MAX_RESULTS: usize = 10;

    /// Upstream request timeout in seconds
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 15;

    /// Server-side timeout embedded in the Overpass query
    pub const OVERPASS_QUERY_TIMEOUT_SECS: u64 = 25;
}

/// Cache settings
pub mod cache {
    /// Nearby result cache duration in seconds (5 minutes)
    pub const NEARBY_TTL_SECS: u64 = 300;

    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}
