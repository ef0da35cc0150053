//! Core domain types, ports, and services for ttsd.
//!
//! This crate has no process, HTTP, or OS-metrics code. Adapters live in
//! `ttsd-runtime` (engine, cache, metrics) and `ttsd-axum` (HTTP).
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod latch;
pub mod paths;
pub mod ports;
pub mod services;

pub use config::{
    AssetPaths, CacheBackend, CacheSettings, ConfigError, DEFAULT_PORT, ReadinessSettings,
    ServiceConfig, SynthesisSettings,
};
pub use domain::{
    BuildIdentity, GenerateRequest, OutputMode, RequestError, ResourceUsage, ServiceReport,
    SynthesisJob, SynthesisOutput, cache_key,
};
pub use latch::AtomicLatch;
pub use paths::PathError;
pub use ports::{
    AudioCache, CacheError, NoopCache, NoopResourceProbe, ResourceProbe, SynthesisError,
    Synthesizer,
};
pub use services::{GenerateError, GenerateOutcome, SpeechService, SpeechSettings, StatusService};

#[cfg(test)]
use tokio_test as _;
