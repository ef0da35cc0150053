//! Service metadata handler.

use axum::Json;
use axum::extract::State;
use ttsd_core::ServiceReport;

use crate::state::AppState;

/// `GET /service`: version, health, and resource usage, computed fresh.
pub async fn service(State(state): State<AppState>) -> Json<ServiceReport> {
    Json(state.status.report().await)
}
