//! Axum web server adapter for ttsd.
//!
//! Exposes the speech service over HTTP:
//!
//! | Route | Auth | Purpose |
//! |---|---|---|
//! | `POST /generate` | bearer (if configured) | synthesize text to WAV |
//! | `GET /health` | none | readiness probe |
//! | `POST /hibernate`, `POST /wakeup` | bearer (if configured) | lifecycle hooks |
//! | `GET /service` | bearer (if configured) | version, health, metrics |
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; integration tests use them
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

pub mod auth;
pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, ServerConfig, bootstrap, shutdown_signal, start_server};
pub use error::HttpError;
pub use routes::{CorsConfig, RouterConfig, create_router};
