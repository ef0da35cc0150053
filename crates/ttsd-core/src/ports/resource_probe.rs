//! Process resource usage port.

use crate::domain::ResourceUsage;

/// Samples CPU and memory usage of the running service.
///
/// Implementations may block briefly (they usually read `/proc` or call into
/// the OS), so async callers should sample on a blocking thread.
pub trait ResourceProbe: Send + Sync {
    fn sample(&self) -> ResourceUsage;
}

/// Probe that always reports zero usage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResourceProbe;

impl ResourceProbe for NoopResourceProbe {
    fn sample(&self) -> ResourceUsage {
        ResourceUsage::default()
    }
}
