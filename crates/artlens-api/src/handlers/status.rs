//! Liveness and provider configuration endpoints.

use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Which optional providers have credentials configured. Does not probe
/// reachability.
pub async fn api_status(State(state): State<AppState>) -> Json<BTreeMap<String, bool>> {
    Json(state.analyzer.check_api_status())
}
