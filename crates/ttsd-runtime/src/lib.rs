//! Process runtime and OS-level adapters for ttsd.
//!
//! Implements the `ttsd-core` ports: the Piper subprocess engine, the
//! in-memory and Redis audio caches, and `sysinfo` metrics. Also hosts the
//! startup asset poller that flips the readiness latch.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod assets;
pub mod cache;
pub mod metrics;
pub mod shutdown;
pub mod synthesizer;

pub use assets::{AssetPollOutcome, wait_for_assets};
pub use cache::{MemoryCache, RedisCache};
pub use metrics::SysinfoResourceProbe;
pub use shutdown::terminate;
pub use synthesizer::{PiperConfig, PiperSynthesizer};

#[cfg(test)]
use tokio_test as _;
