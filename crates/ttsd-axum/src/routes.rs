//! Route definitions and router construction.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::bootstrap::AxumContext;
use crate::handlers;
use crate::state::AppState;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    pub fn from_origins(origins: Option<Vec<String>>) -> Self {
        origins.map_or(Self::AllowAll, Self::AllowOrigins)
    }
}

/// Router-level settings that do not belong to the services.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    pub cors: CorsConfig,
    /// When set, every route except `/health` requires `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Routes that sit behind the optional bearer check.
///
/// `/generate` accepts text of any length, so axum's default body limit is
/// lifted there.
fn service_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/generate",
            post(handlers::generate::generate).layer(DefaultBodyLimit::disable()),
        )
        .route("/hibernate", post(handlers::lifecycle::hibernate))
        .route("/wakeup", post(handlers::lifecycle::wakeup))
        .route("/service", get(handlers::service::service))
}

/// Create the main router.
pub fn create_router(ctx: AxumContext, config: &RouterConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    let mut protected = service_routes();
    if let Some(token) = config.api_token.as_deref() {
        let expected = auth::expected_header(token);
        protected = protected.route_layer(middleware::from_fn(move |req: Request, next: Next| {
            let expected = expected.clone();
            async move { auth::validate_bearer(expected, req, next).await }
        }));
    }

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(protected)
        .with_state(state)
        .layer(build_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}
