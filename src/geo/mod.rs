//! Geographic primitives and location providers
//!
//! - `GeoPoint`: validated latitude/longitude pair
//! - Great-circle distance (`distance`)
//! - Place-name geocoding (`nominatim`) and IP geolocation (`ip_location`)

pub mod distance;
pub mod ip_location;
pub mod nominatim;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point without validation
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that the point is finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// Why a location provider could not produce coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFailure {
    PermissionDenied,
    Unavailable,
    TimedOut,
    Other,
}

impl LocationFailure {
    /// Message suitable for showing to a user
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission was denied.",
            Self::Unavailable => "Location is unavailable on this device right now.",
            Self::TimedOut => "Location timed out. Please try again.",
            Self::Other => "Location failed.",
        }
    }
}

impl std::fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A geocoded location result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub point: GeoPoint,
    /// Display name (address or description)
    pub display_name: String,
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Get the default geocoding backend
pub fn get_geocoder() -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::new()
}

/// Get the IP location service
pub fn get_ip_locator() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).validate().is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).validate().is_ok());
        assert!(GeoPoint::new(51.5074, -0.1278).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::new(90.5, 0.0).validate(),
            Err(Error::InvalidCoordinates(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -181.0).validate(),
            Err(Error::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_location_failure_display() {
        assert_eq!(LocationFailure::PermissionDenied.to_string(), "permission_denied");
        assert_eq!(LocationFailure::TimedOut.to_string(), "timed_out");
        assert!(!LocationFailure::Other.message().is_empty());
    }
}
