//! Nearby emergency places
//!
//! Resolves hospitals and diplomatic offices around a point:
//! - `query`: Overpass QL generation
//! - `overpass`: upstream client
//! - `sanitize`: upstream element cleanup
//! - `cache`: TTL cache with in-flight request sharing
//! - `resolver`: the orchestrating `NearbyResolver`

pub mod cache;
pub mod overpass;
pub mod query;
pub mod resolver;
pub mod sanitize;

use crate::constants::nearby::{
    DIPLOMATIC_RADIUS_METERS, HOSPITALS_RADIUS_METERS, MAX_RADIUS_METERS, MIN_RADIUS_METERS,
};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

pub use resolver::{NearbyResolver, ResolverSettings};

/// Kind of place to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// `amenity=hospital`
    Hospitals,
    /// `amenity=embassy` or `office=diplomatic`
    Diplomatic,
}

impl Category {
    /// Search radius used when the caller gives none
    pub fn default_radius(&self) -> u32 {
        match self {
            Self::Hospitals => HOSPITALS_RADIUS_METERS,
            Self::Diplomatic => DIPLOMATIC_RADIUS_METERS,
        }
    }

    /// Name given to places that carry no `name` tag
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Hospitals => "Hospital",
            Self::Diplomatic => "Embassy / Consulate",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hospitals => write!(f, "hospitals"),
            Self::Diplomatic => write!(f, "diplomatic"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hospitals" => Ok(Self::Hospitals),
            "diplomatic" => Ok(Self::Diplomatic),
            _ => Err(Error::InvalidCategory(format!(
                "Unknown place type '{}' (expected hospitals or diplomatic)",
                s
            ))),
        }
    }
}

/// List all searchable categories
pub fn available_categories() -> Vec<Category> {
    vec![Category::Hospitals, Category::Diplomatic]
}

/// Resolve the effective radius: the override rounded and clamped, or the category default
///
/// Out-of-range overrides are clamped, never rejected. Non-finite ones are rejected.
pub fn resolve_radius(category: Category, radius_override: Option<f64>) -> Result<u32> {
    let Some(radius) = radius_override else {
        return Ok(category.default_radius());
    };

    if !radius.is_finite() {
        return Err(Error::InvalidRadius(format!("{} is not a finite number", radius)));
    }

    Ok(radius
        .round()
        .clamp(MIN_RADIUS_METERS as f64, MAX_RADIUS_METERS as f64) as u32)
}

/// A validated nearby search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub category: Category,
    pub point: GeoPoint,
    pub radius_meters: u32,
}

impl NearbyQuery {
    /// Validate the point and resolve the radius
    pub fn new(category: Category, point: GeoPoint, radius_override: Option<f64>) -> Result<Self> {
        point.validate()?;
        let radius_meters = resolve_radius(category, radius_override)?;

        Ok(Self {
            category,
            point,
            radius_meters,
        })
    }

    /// Parse an untyped category, then validate like [`NearbyQuery::new`]
    pub fn parse(category: &str, point: GeoPoint, radius_override: Option<f64>) -> Result<Self> {
        Self::new(category.parse()?, point, radius_override)
    }

    /// Cache key: category, radius and the point rounded to 3 decimals (~110m)
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{:.3}:{:.3}",
            self.category,
            self.radius_meters,
            key_coordinate(self.point.lat),
            key_coordinate(self.point.lon)
        )
    }
}

/// Round half away from zero to 3 decimals; both zeros share one bucket
fn key_coordinate(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A place returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Upstream element reference, e.g. `way/1234`
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(rename = "distanceM")]
    pub distance_meters: u32,
    pub address: Option<String>,
    /// Raw upstream value; callers turn it into a dial link
    pub phone: Option<String>,
    /// Always an http(s) URL when present
    pub website: Option<String>,
}

/// Response envelope for a nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyResult {
    #[serde(rename = "type")]
    pub category: Category,
    pub lat: f64,
    pub lon: f64,
    pub radius: u32,
    pub items: Vec<PlaceRecord>,
}

/// Upstream failure shared by every caller joined on the same request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// No response within the configured timeout (seconds)
    Timeout(u64),
    /// Transport failure, non-success status or malformed body
    Unavailable(String),
}

impl From<UpstreamError> for Error {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(secs) => Error::UpstreamTimeout(secs),
            UpstreamError::Unavailable(msg) => Error::UpstreamUnavailable(msg),
        }
    }
}
