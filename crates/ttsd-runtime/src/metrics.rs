//! Process resource sampling via `sysinfo`.

use std::sync::Mutex;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

use ttsd_core::{ResourceProbe, ResourceUsage};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// [`ResourceProbe`] reporting this process plus its direct children.
///
/// Children are the live synthesis processes, so CPU and memory reflect the
/// whole service rather than just the HTTP front-end. CPU usage is computed
/// by `sysinfo` as the delta since the previous sample, so the first sample
/// after startup reads low.
pub struct SysinfoResourceProbe {
    pid: Pid,
    system: Mutex<System>,
}

impl SysinfoResourceProbe {
    pub fn new() -> Self {
        Self::for_pid(Pid::from_u32(std::process::id()))
    }

    pub fn for_pid(pid: Pid) -> Self {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        Self {
            pid,
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoResourceProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProbe for SysinfoResourceProbe {
    fn sample(&self) -> ResourceUsage {
        let Ok(mut system) = self.system.lock() else {
            warn!("Resource probe lock poisoned");
            return ResourceUsage::default();
        };
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut cpu = 0.0_f64;
        let mut memory = 0_u64;
        for (pid, process) in system.processes() {
            if *pid == self.pid || process.parent() == Some(self.pid) {
                cpu += f64::from(process.cpu_usage());
                memory = memory.saturating_add(process.memory());
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let memory_mb = memory as f64 / BYTES_PER_MB;
        ResourceUsage {
            cpu_percent: cpu,
            memory_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_own_process() {
        let probe = SysinfoResourceProbe::new();
        let usage = probe.sample();
        assert!(usage.memory_mb > 0.0, "resident memory should be non-zero");
        assert!(usage.cpu_percent >= 0.0);
    }

    #[test]
    fn unknown_pid_reports_zero() {
        let probe = SysinfoResourceProbe::for_pid(Pid::from_u32(u32::MAX - 1));
        assert_eq!(probe.sample(), ResourceUsage::default());
    }
}
