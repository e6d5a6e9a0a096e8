//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/emergency-nearby/config.toml
//!
//! `PORT` and `OVERPASS_URL` in the environment override the file.

pub mod defaults;

use crate::error::{Error, Result};
use crate::nearby::ResolverSettings;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Nearby search settings
    #[serde(default)]
    pub nearby: NearbyConfig,

    /// CLI output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Requests per minute per client IP across the API; 0 disables
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Requests per minute per client IP on `/api/nearby`; 0 disables
    #[serde(default = "default_nearby_rate_limit")]
    pub nearby_rate_limit_per_minute: u32,
}

/// Nearby search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyConfig {
    /// Overpass interpreter URL
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cached result lifetime in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Places returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// CLI output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_rate_limit() -> u32 {
    DEFAULT_RATE_LIMIT_PER_MINUTE
}
fn default_nearby_rate_limit() -> u32 {
    DEFAULT_NEARBY_RATE_LIMIT_PER_MINUTE
}
fn default_overpass_url() -> String {
    DEFAULT_OVERPASS_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            rate_limit_per_minute: default_rate_limit(),
            nearby_rate_limit_per_minute: default_nearby_rate_limit(),
        }
    }
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            overpass_url: default_overpass_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_results: default_max_results(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl NearbyConfig {
    /// Resolver settings for these values
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            max_results: self.max_results,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, then apply environment overrides
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply deployment overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.set("server.port", &port)?;
        }
        if let Some(url) = lookup(OVERPASS_URL_ENV) {
            self.set("nearby.overpass_url", &url)?;
        }
        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "allowed_origins"] => Some(self.server.allowed_origins.join(",")),
            ["server", "rate_limit_per_minute"] => Some(self.server.rate_limit_per_minute.to_string()),
            ["server", "nearby_rate_limit_per_minute"] => {
                Some(self.server.nearby_rate_limit_per_minute.to_string())
            }

            ["nearby", "overpass_url"] => Some(self.nearby.overpass_url.clone()),
            ["nearby", "timeout_secs"] => Some(self.nearby.timeout_secs.to_string()),
            ["nearby", "cache_ttl_secs"] => Some(self.nearby.cache_ttl_secs.to_string()),
            ["nearby", "max_results"] => Some(self.nearby.max_results.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }
            ["server", "allowed_origins"] => {
                self.server.allowed_origins = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["server", "rate_limit_per_minute"] => {
                self.server.rate_limit_per_minute = parse_rate_limit(value)?;
            }
            ["server", "nearby_rate_limit_per_minute"] => {
                self.server.nearby_rate_limit_per_minute = parse_rate_limit(value)?;
            }

            ["nearby", "overpass_url"] => {
                url::Url::parse(value)
                    .map_err(|e| Error::Config(format!("Invalid Overpass URL {}: {}", value, e)))?;
                self.nearby.overpass_url = value.to_string();
            }
            ["nearby", "timeout_secs"] => {
                self.nearby.timeout_secs = parse_positive(value, "timeout")?;
            }
            ["nearby", "cache_ttl_secs"] => {
                self.nearby.cache_ttl_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid cache TTL value: {}", value)))?;
            }
            ["nearby", "max_results"] => {
                self.nearby.max_results = parse_positive(value, "max results")?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "server.allowed_origins",
            "server.rate_limit_per_minute",
            "server.nearby_rate_limit_per_minute",
            "nearby.overpass_url",
            "nearby.timeout_secs",
            "nearby.cache_ttl_secs",
            "nearby.max_results",
            "output.format",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_positive<T>(value: &str, what: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(Error::Config(format!("Invalid {} value: {}", what, value))),
    }
}

fn parse_rate_limit(value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid rate limit value: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.nearby.overpass_url, "https://overpass-api.de/api/interpreter");
        assert_eq!(config.nearby.timeout_secs, 15);
        assert_eq!(config.nearby.cache_ttl_secs, 300);
        assert_eq!(config.nearby.max_results, 10);
        assert_eq!(config.output.format, "text");
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.server.rate_limit_per_minute, 120);
        assert_eq!(config.server.nearby_rate_limit_per_minute, 30);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        config.set("nearby.timeout_secs", "20").unwrap();
        assert_eq!(config.get("nearby.timeout_secs"), Some("20".to_string()));

        config.set("server.allowed_origins", "https://a.example, ,https://b.example").unwrap();
        assert_eq!(config.server.allowed_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(
            config.get("server.allowed_origins"),
            Some("https://a.example,https://b.example".to_string())
        );
    }

    #[test]
    fn test_rate_limits_can_be_disabled() {
        let mut config = Config::default();

        config.set("server.nearby_rate_limit_per_minute", "0").unwrap();
        config.set("server.rate_limit_per_minute", "600").unwrap();
        assert_eq!(config.server.nearby_rate_limit_per_minute, 0);
        assert_eq!(config.get("server.rate_limit_per_minute"), Some("600".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_port").is_err());
        assert!(config.set("nearby.timeout_secs", "0").is_err());
        assert!(config.set("nearby.max_results", "-1").is_err());
        assert!(config.set("nearby.overpass_url", "not a url").is_err());
        assert!(config.set("server.nearby_rate_limit_per_minute", "-5").is_err());
        assert_eq!(config.nearby.max_results, 10);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [("PORT", "8080"), ("OVERPASS_URL", "http://localhost:12345/api")]
            .into_iter()
            .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.nearby.overpass_url, "http://localhost:12345/api");
    }

    #[test]
    fn test_bad_env_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| (name == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.nearby.max_results = 5;
        config.server.port = 9000;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.nearby.max_results, 5);
        assert_eq!(loaded.server.port, 9000);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[nearby]\nmax_results = 3\n").unwrap();
        assert_eq!(config.nearby.max_results, 3);
        assert_eq!(config.nearby.timeout_secs, 15);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[nearby]"));
        assert!(toml.contains("[output]"));
    }

    #[test]
    fn test_resolver_settings() {
        let settings = Config::default().nearby.resolver_settings();
        assert_eq!(settings, ResolverSettings::default());
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(Config::default().server_addr(), "127.0.0.1:5000");
    }
}
