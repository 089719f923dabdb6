//! REST API endpoints.
//!
//! Axum-based HTTP API exposing the current-match lookup.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::upstream::UpstreamError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        let message = err.to_string();
        match err {
            UpstreamError::NotFound(_) => ApiError::NotFound(message),
            UpstreamError::Configuration(_) => ApiError::Internal(message),
            UpstreamError::RateLimited => ApiError::Unavailable(message),
            UpstreamError::Auth
            | UpstreamError::Upstream { .. }
            | UpstreamError::Decode { .. }
            | UpstreamError::Transport(_) => ApiError::BadGateway(message),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let cors = match cors_origin {
        "*" => cors.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => cors.allow_origin(AllowOrigin::exact(value)),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
                cors.allow_origin(Any)
            }
        },
    };

    Router::new()
        .route("/api/v1/ping", get(routes::matches::ping))
        .route("/api/v1/rito/match", get(routes::matches::find_match))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::Resource;

    #[test]
    fn test_upstream_error_mapping() {
        assert!(matches!(
            ApiError::from(UpstreamError::NotFound(Resource::Summoner)),
            ApiError::NotFound(ref m) if m == "summoner not found"
        ));
        assert!(matches!(
            ApiError::from(UpstreamError::Configuration("no host".to_string())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(UpstreamError::RateLimited),
            ApiError::Unavailable(_)
        ));
        assert!(matches!(
            ApiError::from(UpstreamError::Auth),
            ApiError::BadGateway(ref m) if m == "credential may be expired"
        ));
        assert!(matches!(
            ApiError::from(UpstreamError::Upstream { status: 500 }),
            ApiError::BadGateway(_)
        ));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (ApiError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
