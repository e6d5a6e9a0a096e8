//! Error types for emergency-nearby

use crate::geo::LocationFailure;
use thiserror::Error;

/// Main error type for emergency-nearby operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Nearby provider timed out after {0}s")]
    UpstreamTimeout(u64),

    #[error("Nearby provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{}", .0.message())]
    Location(LocationFailure),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for emergency-nearby operations
pub type Result<T> = std::result::Result<T, Error>;
