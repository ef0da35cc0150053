//! HTTP handlers, one module per route group.

pub mod generate;
pub mod health;
pub mod lifecycle;
pub mod service;
