//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process, filesystem, or network details in any signature
//! - Every port has a no-op implementation so optional infrastructure never
//!   forces the caller to branch

pub mod cache;
pub mod resource_probe;
pub mod synthesizer;

pub use cache::{AudioCache, CacheError, NoopCache};
pub use resource_probe::{NoopResourceProbe, ResourceProbe};
pub use synthesizer::{SynthesisError, Synthesizer};
