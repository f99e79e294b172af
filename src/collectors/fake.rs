use crate::collectors::{
    DiskReading, MemoryReading, MetricsProvider, ProcessReading, ProviderError,
};
use std::collections::VecDeque;
use std::time::Duration;

enum DiskEntry {
    Ok(DiskReading),
    Denied,
    Broken,
}

enum ProcessEntry {
    Ok(ProcessReading),
    Vanished,
    Denied,
}

/// Scripted provider used by tests in place of the sysinfo backend.
pub struct FakeProvider {
    cpu: f64,
    cpu_script: VecDeque<f64>,
    cpu_fails: bool,
    memory: MemoryReading,
    disks: Vec<(String, DiskEntry)>,
    processes: Vec<(u32, ProcessEntry)>,
    cpu_windows: Vec<Duration>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            cpu: 0.0,
            cpu_script: VecDeque::new(),
            cpu_fails: false,
            memory: MemoryReading {
                total_bytes: 100,
                used_bytes: 10,
                available_bytes: 90,
            },
            disks: Vec::new(),
            processes: Vec::new(),
            cpu_windows: Vec::new(),
        }
    }

    pub fn with_cpu(mut self, cpu: f64) -> Self {
        self.cpu = cpu;
        self
    }

    /// Successive cycles read these values first, then fall back to `with_cpu`.
    pub fn with_cpu_script(mut self, script: &[f64]) -> Self {
        self.cpu_script = script.iter().copied().collect();
        self
    }

    pub fn with_failing_cpu(mut self) -> Self {
        self.cpu_fails = true;
        self
    }

    pub fn with_memory(mut self, total: u64, used: u64, available: u64) -> Self {
        self.memory = MemoryReading {
            total_bytes: total,
            used_bytes: used,
            available_bytes: available,
        };
        self
    }

    pub fn with_disk(mut self, mount: &str, reading: DiskReading) -> Self {
        self.disks.push((mount.to_string(), DiskEntry::Ok(reading)));
        self
    }

    pub fn with_denied_disk(mut self, mount: &str) -> Self {
        self.disks.push((mount.to_string(), DiskEntry::Denied));
        self
    }

    pub fn with_broken_disk(mut self, mount: &str) -> Self {
        self.disks.push((mount.to_string(), DiskEntry::Broken));
        self
    }

    pub fn with_process(
        mut self,
        pid: u32,
        name: &str,
        cpu: Option<f64>,
        mem: Option<f64>,
    ) -> Self {
        self.processes.push((
            pid,
            ProcessEntry::Ok(ProcessReading {
                pid,
                name: name.to_string(),
                cpu_percent: cpu,
                memory_percent: mem,
            }),
        ));
        self
    }

    pub fn with_vanished_process(mut self, pid: u32) -> Self {
        self.processes.push((pid, ProcessEntry::Vanished));
        self
    }

    pub fn with_denied_process(mut self, pid: u32) -> Self {
        self.processes.push((pid, ProcessEntry::Denied));
        self
    }

    pub fn cpu_windows(&self) -> Vec<Duration> {
        self.cpu_windows.clone()
    }

    /// Number of cycles that reached the provider.
    pub fn samples(&self) -> usize {
        self.cpu_windows.len()
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for FakeProvider {
    fn cpu_percent(&mut self, window: Duration) -> Result<f64, ProviderError> {
        self.cpu_windows.push(window);
        if self.cpu_fails {
            return Err(ProviderError::Unavailable {
                what: "cpu".to_string(),
                detail: "scripted failure".to_string(),
            });
        }
        Ok(self.cpu_script.pop_front().unwrap_or(self.cpu))
    }

    fn memory(&mut self) -> Result<MemoryReading, ProviderError> {
        Ok(self.memory)
    }

    fn partitions(&mut self) -> Result<Vec<String>, ProviderError> {
        Ok(self.disks.iter().map(|(mount, _)| mount.clone()).collect())
    }

    fn disk_usage(&mut self, mount: &str) -> Result<DiskReading, ProviderError> {
        match self.disks.iter().find(|(m, _)| m == mount).map(|(_, e)| e) {
            Some(DiskEntry::Ok(reading)) => Ok(*reading),
            Some(DiskEntry::Denied) => Err(ProviderError::AccessDenied {
                resource: mount.to_string(),
            }),
            Some(DiskEntry::Broken) | None => Err(ProviderError::Unavailable {
                what: format!("disk {mount}"),
                detail: "scripted failure".to_string(),
            }),
        }
    }

    fn pids(&mut self) -> Result<Vec<u32>, ProviderError> {
        Ok(self.processes.iter().map(|(pid, _)| *pid).collect())
    }

    fn process(&mut self, pid: u32) -> Result<ProcessReading, ProviderError> {
        match self.processes.iter().find(|(p, _)| *p == pid).map(|(_, e)| e) {
            Some(ProcessEntry::Ok(reading)) => Ok(reading.clone()),
            Some(ProcessEntry::Denied) => Err(ProviderError::AccessDenied {
                resource: format!("process {pid}"),
            }),
            Some(ProcessEntry::Vanished) | None => Err(ProviderError::NoSuchProcess { pid }),
        }
    }
}
