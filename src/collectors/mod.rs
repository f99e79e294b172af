#[cfg(test)]
pub mod fake;
pub mod snapshot;
pub mod system;

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReading {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("access denied to {resource}")]
    AccessDenied { resource: String },
    #[error("process {pid} no longer exists")]
    NoSuchProcess { pid: u32 },
    #[error("{what} unavailable: {detail}")]
    Unavailable { what: String, detail: String },
}

/// Source of raw host metrics consumed by the collector.
///
/// Whole-system readings fail the cycle; per-item readings (`disk_usage`,
/// `process`) may fail individually and are classified by the collector.
pub trait MetricsProvider {
    /// Blocks for `window` and returns average utilisation over it.
    fn cpu_percent(&mut self, window: Duration) -> Result<f64, ProviderError>;
    fn memory(&mut self) -> Result<MemoryReading, ProviderError>;
    fn partitions(&mut self) -> Result<Vec<String>, ProviderError>;
    fn disk_usage(&mut self, mount: &str) -> Result<DiskReading, ProviderError>;
    fn pids(&mut self) -> Result<Vec<u32>, ProviderError>;
    fn process(&mut self, pid: u32) -> Result<ProcessReading, ProviderError>;
}

/// Outcome of reading one disk or process.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    Read(T),
    Skip,
}

impl<T> Probe<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Probe::Read(v) => Some(v),
            Probe::Skip => None,
        }
    }
}
