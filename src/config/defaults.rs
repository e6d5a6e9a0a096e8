//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default requests per minute per client across the API
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;

/// Default requests per minute per client on the nearby endpoint
pub const DEFAULT_NEARBY_RATE_LIMIT_PER_MINUTE: u32 = 30;

/// Default Overpass interpreter
pub const DEFAULT_OVERPASS_URL: &str = constants::api::OVERPASS_URL;

/// Default upstream timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = constants::nearby::UPSTREAM_TIMEOUT_SECS;

/// Default nearby cache lifetime in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = constants::cache::NEARBY_TTL_SECS;

/// Default number of places per search
pub const DEFAULT_MAX_RESULTS: usize = constants::nearby::MAX_RESULTS;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "emergency-nearby";

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding `nearby.overpass_url`
pub const OVERPASS_URL_ENV: &str = "OVERPASS_URL";
