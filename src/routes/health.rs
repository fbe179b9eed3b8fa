use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::routes::AppState;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

/// A missing gateway degrades checkout to per-request 503s; the process
/// itself stays ready.
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Json<Value> {
    let gateway = if state.gateway.is_some() {
        "configured"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "ready",
        "payment_gateway": gateway,
    }))
}
