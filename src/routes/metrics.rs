use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::routes::AppState;

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    state.metrics.render().map_err(|e| {
        tracing::error!("metrics render failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
