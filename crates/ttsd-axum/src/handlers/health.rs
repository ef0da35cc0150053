//! Readiness probe.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// `GET /health`: `200 OK` once assets are confirmed, `503 initializing` before.
pub async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.speech.is_ready() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    }
}
