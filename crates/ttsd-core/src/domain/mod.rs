//! Domain types: requests, synthesis jobs, and the service report.

mod job;
mod report;
mod request;

pub use job::{OutputMode, SynthesisJob, SynthesisOutput};
pub use report::{
    BuildIdentity, HealthReport, MetricValue, MetricsReport, ResourceUsage, ServiceReport,
    VersionParts, VersionReport, format_uptime,
};
pub use request::{CACHE_KEY_PREFIX, GenerateRequest, RequestError, cache_key};
