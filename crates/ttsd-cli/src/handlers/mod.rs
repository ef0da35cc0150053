//! Command handlers.

pub mod serve;
pub mod version;
