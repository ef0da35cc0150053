//! Service status: readiness, uptime, version, and resource usage.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use crate::domain::{
    BuildIdentity, HealthReport, MetricsReport, ResourceUsage, ServiceReport, VersionReport,
    format_uptime,
};
use crate::latch::AtomicLatch;
use crate::ports::ResourceProbe;

const STATUS_READY: &str = "OK";
const STATUS_INITIALIZING: &str = "INITIALIZING";

/// Builds the `/service` report on demand.
pub struct StatusService {
    started: Instant,
    ready: Arc<AtomicLatch>,
    probe: Arc<dyn ResourceProbe>,
    version: VersionReport,
}

impl StatusService {
    pub fn new(
        ready: Arc<AtomicLatch>,
        probe: Arc<dyn ResourceProbe>,
        identity: &BuildIdentity,
    ) -> Self {
        Self {
            started: Instant::now(),
            ready,
            probe,
            version: VersionReport::from(identity),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_set()
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: if self.is_ready() {
                STATUS_READY
            } else {
                STATUS_INITIALIZING
            }
            .to_string(),
            uptime: format_uptime(self.started.elapsed()),
        }
    }

    /// Fresh snapshot. The probe runs on a blocking thread.
    pub async fn report(&self) -> ServiceReport {
        let probe = Arc::clone(&self.probe);
        let usage = tokio::task::spawn_blocking(move || probe.sample())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Resource sampling failed");
                ResourceUsage::default()
            });

        ServiceReport {
            version: self.version.clone(),
            health: self.health(),
            metrics: MetricsReport::from(usage),
        }
    }
}
