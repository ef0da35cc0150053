//! Orchestrator lifecycle hooks.
//!
//! The engine runs one process per request, so there is nothing resident to
//! park or warm up. Both calls only acknowledge.

use axum::Json;

use crate::dto::LifecycleResponse;

/// `POST /hibernate`
pub async fn hibernate() -> Json<LifecycleResponse> {
    Json(LifecycleResponse::ok("process-idle"))
}

/// `POST /wakeup`
pub async fn wakeup() -> Json<LifecycleResponse> {
    Json(LifecycleResponse::ok("ready"))
}
