//! # artlens-api
//!
//! HTTP surface for the analysis pipeline. The binary in `main.rs` wires
//! configuration and logging; everything routable lives here so it can be
//! driven in tests without a socket.

pub mod handlers;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, field, info_span, Span};
use uuid::Uuid;

use artlens_analysis::Analyzer;
use artlens_core::defaults::MAX_BODY_SIZE_BYTES;
use artlens_core::logging;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// One span per request, tagged with a UUIDv7 correlation id so every
/// stage of an analysis can be followed in the logs.
fn request_span(request: &Request<Body>) -> Span {
    let span = info_span!(
        "http_request",
        subsystem = "api",
        method = %request.method(),
        uri = %request.uri(),
        request_id = field::Empty,
    );
    span.record(logging::REQUEST_ID, field::display(Uuid::now_v7()));
    span
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::status::health_check))
        .route("/api/v1/status", get(handlers::status::api_status))
        .route("/api/v1/analyze", post(handlers::analyze::analyze_image))
        .route(
            "/api/v1/analyze/upload",
            post(handlers::analyze::analyze_upload),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
        // Outermost, so oversized and rejected requests are traced too.
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    /// Every upstream provider failed.
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    Internal(String),
}

impl From<artlens_core::Error> for ApiError {
    fn from(err: artlens_core::Error) -> Self {
        match err {
            artlens_core::Error::InvalidInput(_) | artlens_core::Error::ImageDecode(_) => {
                ApiError::BadRequest(err.to_string())
            }
            artlens_core::Error::NoDataAvailable => ApiError::BadGateway(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
