use chrono::{DateTime, Local};
use std::fmt;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStats {
    pub percent: f64,
    pub used_gb: f64,
    pub total_gb: f64,
    pub available_gb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskStats {
    pub mount: String,
    pub percent: f64,
    pub used_gb: f64,
    pub total_gb: f64,
    pub free_gb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
}

/// One point-in-time capture of everything a cycle looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub captured_at: DateTime<Local>,
    pub cpu_percent: f64,
    pub memory: MemoryStats,
    /// Partition enumeration order; unreadable mounts are absent.
    pub disks: Vec<DiskStats>,
    pub process_count: usize,
    pub top_processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    ThresholdExceeded,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::ThresholdExceeded => "THRESHOLD_EXCEEDED",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn threshold_exceeded(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::ThresholdExceeded,
            message: message.into(),
        }
    }
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 100.0).round() / 100.0
}

impl MemoryStats {
    pub fn from_bytes(total: u64, used: u64, available: u64) -> Self {
        let percent = if total > 0 {
            (total.saturating_sub(available) as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            percent,
            used_gb: bytes_to_gb(used),
            total_gb: bytes_to_gb(total),
            available_gb: bytes_to_gb(available),
        }
    }
}

impl DiskStats {
    /// `total` must be non-zero; zero-capacity mounts are filtered out by the collector.
    pub fn from_bytes(mount: impl Into<String>, total: u64, used: u64, free: u64) -> Self {
        Self {
            mount: mount.into(),
            percent: (used as f64 / total as f64) * 100.0,
            used_gb: bytes_to_gb(used),
            total_gb: bytes_to_gb(total),
            free_gb: bytes_to_gb(free),
        }
    }
}

#[cfg(test)]
impl Snapshot {
    /// Fixed, alert-free snapshot for tests.
    pub(crate) fn quiet() -> Self {
        use chrono::TimeZone;
        Self {
            captured_at: Local
                .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
                .single()
                .expect("valid local time"),
            cpu_percent: 10.0,
            memory: MemoryStats {
                percent: 40.0,
                used_gb: 6.4,
                total_gb: 16.0,
                available_gb: 9.6,
            },
            disks: vec![],
            process_count: 120,
            top_processes: vec![],
        }
    }
}
