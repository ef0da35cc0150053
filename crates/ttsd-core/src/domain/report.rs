//! `/service` report types.
//!
//! The report is a point-in-time snapshot computed per request and never
//! stored. Field names are part of the orchestration contract, so they are
//! spelled out explicitly rather than derived from Rust naming.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static build identity injected by the composition root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIdentity {
    pub semver: String,
    pub branch: String,
    pub commit: String,
    pub build_date: String,
    pub arch: String,
}

impl BuildIdentity {
    /// `<semver>.<branch>.<commit>.<build_date>.<arch>`
    pub fn full(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            self.semver, self.branch, self.commit, self.build_date, self.arch
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub version: VersionReport,
    pub health: HealthReport,
    pub metrics: MetricsReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReport {
    #[serde(rename = "str")]
    pub full: String,
    #[serde(rename = "obj")]
    pub parts: VersionParts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionParts {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub branch: String,
    pub commit: String,
    pub build_date: String,
    pub arch: String,
}

impl From<&BuildIdentity> for VersionReport {
    fn from(identity: &BuildIdentity) -> Self {
        let mut numbers = identity.semver.split('.');
        let mut next = || numbers.next().unwrap_or("0").to_string();
        let (major, minor, patch) = (next(), next(), next());
        Self {
            full: identity.full(),
            parts: VersionParts {
                major,
                minor,
                patch,
                branch: identity.branch.clone(),
                commit: identity.commit.clone(),
                build_date: identity.build_date.clone(),
                arch: identity.arch.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `"OK"` once assets are confirmed, `"INITIALIZING"` before.
    pub status: String,
    pub uptime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub cpu: MetricValue,
    pub memory: MetricValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub avg: f64,
}

/// Resource usage of this process and its live synthesis children.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceUsage {
    /// Summed CPU usage in percent of one core.
    pub cpu_percent: f64,
    /// Summed resident memory in megabytes.
    pub memory_mb: f64,
}

impl From<ResourceUsage> for MetricsReport {
    fn from(usage: ResourceUsage) -> Self {
        Self {
            cpu: MetricValue {
                avg: usage.cpu_percent,
            },
            memory: MetricValue {
                avg: usage.memory_mb,
            },
        }
    }
}

/// Render an uptime like `"1d 2h 3m 4s"`, dropping the day part when zero.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else {
        format!("{hours}h {minutes}m {seconds}s")
    }
}
