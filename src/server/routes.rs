//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geo::GeoPoint;
use crate::nearby::overpass::PlacesBackend;
use crate::nearby::NearbyResult;
use crate::server::state::AppState;

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use governor::middleware::NoOpMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::{GovernorError, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

type RateLimitLayer = GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware>;

/// Create the API router
///
/// The server must be served with `ConnectInfo<SocketAddr>` so the
/// rate limiters can key on the peer address.
pub fn create_router<B: PlacesBackend>(state: Arc<AppState<B>>) -> Router {
    let server = &state.config.server;

    let mut nearby = get(nearby_handler::<B>);
    if let Some(limit) = rate_limit(server.nearby_rate_limit_per_minute) {
        nearby = nearby.layer(limit);
    }

    let mut router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/nearby", nearby);
    if let Some(limit) = rate_limit(server.rate_limit_per_minute) {
        router = router.layer(limit);
    }

    router = router.layer(cors_layer(&server.allowed_origins));
    if let Some(origins) = restricted_origins(&server.allowed_origins) {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(origins),
            reject_unlisted_origin,
        ));
    }

    router
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("geolocation=(self)"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configured origins, or `None` when any origin is allowed
fn restricted_origins(allowed_origins: &[String]) -> Option<Vec<String>> {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(allowed_origins.to_vec())
    }
}

/// GET-only CORS; any origin unless a list is configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET]);

    let Some(allowed) = restricted_origins(allowed_origins) else {
        return layer.allow_origin(Any);
    };

    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Requests without an `Origin` header (curl, same-origin) always pass
async fn reject_unlisted_origin(
    State(allowed): State<Arc<Vec<String>>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allowed.iter().any(|o| o.as_bytes() == origin.as_bytes()) {
            warn!("Blocked request from origin {:?}", origin);
            return ApiError {
                error: "CORS blocked".to_string(),
                code: "CORS_BLOCKED".to_string(),
                status: StatusCode::FORBIDDEN,
            }
            .into_response();
        }
    }

    next.run(request).await
}

/// Per-IP limiter allowing `per_minute` requests, refilled evenly over a minute
fn rate_limit(per_minute: u32) -> Option<RateLimitLayer> {
    if per_minute == 0 {
        return None;
    }

    let config = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / u64::from(per_minute)).max(1))
        .burst_size(per_minute)
        .error_handler(rate_limited_response)
        .finish()?;

    Some(GovernorLayer {
        config: Arc::new(config),
    })
}

fn rate_limited_response(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, headers } => {
            debug!("Rate limited, retry in {}s", wait_time);
            let mut response = ApiError {
                error: "Too many requests, please try again later.".to_string(),
                code: "RATE_LIMITED".to_string(),
                status: StatusCode::TOO_MANY_REQUESTS,
            }
            .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        other => {
            warn!("Rate limiter rejected request: {}", other);
            ApiError::from(Error::Server(other.to_string())).into_response()
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code, message) = match &err {
            Error::InvalidCategory(_) => (StatusCode::BAD_REQUEST, "INVALID_TYPE", err.to_string()),
            Error::InvalidCoordinates(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_COORDINATES", err.to_string())
            }
            Error::InvalidRadius(_) => (StatusCode::BAD_REQUEST, "INVALID_RADIUS", err.to_string()),
            Error::UpstreamTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "Nearby provider timed out".to_string(),
            ),
            Error::UpstreamUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Failed to fetch nearby places".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Unexpected error".to_string(),
            ),
        };

        ApiError {
            error: message,
            code: code.to_string(),
            status,
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

/// Liveness check
///
/// GET /api/health
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "Server is healthy".to_string(),
    })
}

/// Nearby query string; kept as text so bad numbers become typed API errors
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(rename = "radiusM", default)]
    pub radius_m: Option<String>,
}

/// Blank values read as zero; missing or unparseable ones become NaN and fail validation
fn parse_number(raw: Option<&str>) -> f64 {
    match raw.map(str::trim) {
        Some("") => 0.0,
        Some(s) => s.parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}

/// Find hospitals or embassies near a point
///
/// GET /api/nearby?type=hospitals&lat=51.5&lon=-0.12&radiusM=5000
async fn nearby_handler<B: PlacesBackend>(
    State(state): State<Arc<AppState<B>>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResult>, ApiError> {
    let point = GeoPoint::new(
        parse_number(params.lat.as_deref()),
        parse_number(params.lon.as_deref()),
    );
    let radius = params.radius_m.as_deref().map(|r| parse_number(Some(r)));

    let result = state
        .resolver
        .find_nearby(params.category.as_deref().unwrap_or_default(), point, radius)
        .await
        .map_err(|e| {
            warn!("Nearby request failed: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(result))
}
