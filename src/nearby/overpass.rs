//! Overpass API client
//!
//! POSTs a generated query as plain text and decodes the `elements` list.

use crate::constants::api::USER_AGENT;
use crate::error::Result;
use crate::nearby::UpstreamError;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;

/// Overpass JSON response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// A node, way or relation
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Centroid, present on ways and relations with `out center`
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// Trait for spatial data backends
pub trait PlacesBackend: Send + Sync + 'static {
    /// Run a query and return the raw elements
    fn fetch(&self, query: String) -> impl Future<Output = std::result::Result<OverpassResponse, UpstreamError>> + Send;
}

/// Overpass interpreter backend
#[derive(Debug, Clone)]
pub struct OverpassBackend {
    client: reqwest::Client,
    url: String,
}

impl OverpassBackend {
    /// Create a backend for the given interpreter URL
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Interpreter URL this backend posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PlacesBackend for OverpassBackend {
    async fn fetch(&self, query: String) -> std::result::Result<OverpassResponse, UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(format!("Overpass request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Unavailable(format!(
                "Overpass returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Unavailable(format!("Failed to parse Overpass response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 51.5, "lon": -0.1, "tags": {"amenity": "hospital", "name": "A"}},
                {"type": "way", "id": 2, "center": {"lat": 51.6, "lon": -0.2}, "tags": {"amenity": "hospital"}},
                {"type": "relation", "id": 3}
            ]
        }"#;

        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.elements.len(), 3);
        assert_eq!(response.elements[0].kind, "node");
        assert_eq!(response.elements[0].tags.get("name").map(String::as_str), Some("A"));
        assert!(response.elements[1].lat.is_none());
        assert_eq!(response.elements[1].center.map(|c| c.lat), Some(51.6));
        assert!(response.elements[2].tags.is_empty());
    }

    #[test]
    fn test_missing_elements_is_empty() {
        let response: OverpassResponse = serde_json::from_str("{}").unwrap();
        assert!(response.elements.is_empty());
    }

    #[test]
    fn test_backend_creation() {
        let backend = OverpassBackend::new("http://localhost:12345/api/interpreter").unwrap();
        assert_eq!(backend.url(), "http://localhost:12345/api/interpreter");
    }
}
