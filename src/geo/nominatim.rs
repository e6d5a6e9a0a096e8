//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Turns a place name ("Brussels", "10 Downing Street") into a search center.
//! Rate limit: 1 request per second, identified by User-Agent.

use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeoLocation, GeoPoint};
use serde::Deserialize;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a backend pointed at the public Nominatim instance
    pub fn new() -> Result<Self> {
        Self::with_base_url(NOMINATIM_URL)
    }

    /// Create a backend pointed at a custom Nominatim instance
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse lat/lon strings to a point
    fn parse_point(lat: &str, lon: &str) -> Result<GeoPoint> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lon)))?;
        Ok(GeoPoint::new(lat, lon))
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>> {
        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        match results.into_iter().next() {
            Some(result) => Ok(Some(GeoLocation {
                point: Self::parse_point(&result.lat, &result.lon)?,
                display_name: result.display_name,
            })),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = NominatimBackend::parse_point("50.8503", "4.3517").unwrap();
        assert!((point.lat - 50.8503).abs() < 0.0001);
        assert!((point.lon - 4.3517).abs() < 0.0001);
    }

    #[test]
    fn test_parse_point_invalid() {
        assert!(NominatimBackend::parse_point("invalid", "0").is_err());
        assert!(NominatimBackend::parse_point("0", "invalid").is_err());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let backend = NominatimBackend::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(
            backend.search_url("Rue de la Loi 16, Bruxelles"),
            "http://localhost:8080/search?q=Rue%20de%20la%20Loi%2016%2C%20Bruxelles&format=json&limit=1"
        );
    }
}
