use crate::collectors::{
    DiskReading, MemoryReading, MetricsProvider, ProcessReading, ProviderError,
};
use std::path::Path;
use std::thread;
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, Pid, PidExt, ProcessExt, System, SystemExt};
use tracing::debug;

/// Host metrics read through `sysinfo`.
pub struct SysinfoProvider {
    system: System,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_disks_list();
        Self { system }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent(&mut self, window: Duration) -> Result<f64, ProviderError> {
        // Processes are refreshed on both sides of the window so per-process
        // usage read later in the cycle covers the same span.
        self.system.refresh_cpu();
        self.system.refresh_processes();
        thread::sleep(window);
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(ProviderError::Unavailable {
                what: "cpu".to_string(),
                detail: "no cpus reported".to_string(),
            });
        }
        Ok(self.system.global_cpu_info().cpu_usage() as f64)
    }

    fn memory(&mut self) -> Result<MemoryReading, ProviderError> {
        self.system.refresh_memory();
        let total_bytes = self.system.total_memory();
        if total_bytes == 0 {
            return Err(ProviderError::Unavailable {
                what: "memory".to_string(),
                detail: "total memory reported as zero".to_string(),
            });
        }
        Ok(MemoryReading {
            total_bytes,
            used_bytes: self.system.used_memory(),
            available_bytes: self.system.available_memory(),
        })
    }

    fn partitions(&mut self) -> Result<Vec<String>, ProviderError> {
        self.system.refresh_disks_list();
        Ok(self
            .system
            .disks()
            .iter()
            .map(|d| d.mount_point().to_string_lossy().to_string())
            .collect())
    }

    fn disk_usage(&mut self, mount: &str) -> Result<DiskReading, ProviderError> {
        let disk = self
            .system
            .disks_mut()
            .iter_mut()
            .find(|d| d.mount_point() == Path::new(mount))
            .ok_or_else(|| ProviderError::AccessDenied {
                resource: mount.to_string(),
            })?;

        // sysinfo has no error channel for statvfs; a failed refresh is the
        // closest signal that the mount cannot be read.
        if !disk.refresh() {
            debug!(mount, "disk refresh failed");
            return Err(ProviderError::AccessDenied {
                resource: mount.to_string(),
            });
        }

        let total_bytes = disk.total_space();
        let free_bytes = disk.available_space();
        Ok(DiskReading {
            total_bytes,
            used_bytes: total_bytes.saturating_sub(free_bytes),
            free_bytes,
        })
    }

    /// Ascending, so enumeration order and top-process ties are reproducible.
    fn pids(&mut self) -> Result<Vec<u32>, ProviderError> {
        self.system.refresh_processes();
        let mut pids: Vec<u32> = self
            .system
            .processes()
            .keys()
            .map(|pid| pid.as_u32())
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn process(&mut self, pid: u32) -> Result<ProcessReading, ProviderError> {
        let total_memory = self.system.total_memory();
        let process = self
            .system
            .process(Pid::from_u32(pid))
            .ok_or(ProviderError::NoSuchProcess { pid })?;

        let memory_percent = if total_memory > 0 {
            Some((process.memory() as f64 / total_memory as f64) * 100.0)
        } else {
            None
        };

        Ok(ProcessReading {
            pid,
            name: process.name().to_string(),
            cpu_percent: Some(process.cpu_usage() as f64),
            memory_percent,
        })
    }
}
