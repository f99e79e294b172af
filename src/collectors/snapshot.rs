use crate::collectors::{MetricsProvider, Probe, ProcessReading, ProviderError};
use crate::state::{DiskStats, MemoryStats, ProcessInfo, Snapshot};
use chrono::Local;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct CollectorSettings {
    pub cpu_window: Duration,
    pub top_limit: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            cpu_window: Duration::from_secs(1),
            top_limit: 5,
        }
    }
}

pub struct Collector<P> {
    provider: P,
    settings: CollectorSettings,
}

impl<P: MetricsProvider> Collector<P> {
    pub fn new(provider: P, settings: CollectorSettings) -> Self {
        Self { provider, settings }
    }

    #[cfg(test)]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn collect(&mut self) -> Result<Snapshot, ProviderError> {
        let cpu_percent = self.provider.cpu_percent(self.settings.cpu_window)?;

        let mem = self.provider.memory()?;
        let memory = MemoryStats::from_bytes(mem.total_bytes, mem.used_bytes, mem.available_bytes);
        debug!(
            percent = memory.percent,
            available_gb = memory.available_gb,
            "memory read"
        );

        let mut disks: Vec<DiskStats> = Vec::new();
        for mount in self.provider.partitions()? {
            let Some(stats) = self.probe_disk(&mount)?.into_option() else {
                continue;
            };
            // Stacked mounts list the same mount point more than once; the
            // latest reading wins but keeps the first position.
            match disks.iter_mut().find(|d| d.mount == stats.mount) {
                Some(existing) => *existing = stats,
                None => disks.push(stats),
            }
        }

        let pids = self.provider.pids()?;
        let process_count = pids.len();

        let processes: Vec<ProcessInfo> = pids
            .into_iter()
            .filter_map(|pid| self.probe_process(pid).into_option())
            .collect();
        let top_processes = top_processes(processes, self.settings.top_limit);

        Ok(Snapshot {
            captured_at: Local::now(),
            cpu_percent,
            memory,
            disks,
            process_count,
            top_processes,
        })
    }

    fn probe_disk(&mut self, mount: &str) -> Result<Probe<DiskStats>, ProviderError> {
        match self.provider.disk_usage(mount) {
            Ok(usage) if usage.total_bytes == 0 => {
                debug!(mount, "skipping zero-capacity mount");
                Ok(Probe::Skip)
            }
            Ok(usage) => {
                let stats = DiskStats::from_bytes(
                    mount,
                    usage.total_bytes,
                    usage.used_bytes,
                    usage.free_bytes,
                );
                debug!(mount, percent = stats.percent, free_gb = stats.free_gb, "disk read");
                Ok(Probe::Read(stats))
            }
            Err(ProviderError::AccessDenied { .. }) => {
                debug!(mount, "skipping unreadable mount");
                Ok(Probe::Skip)
            }
            Err(err) => Err(err),
        }
    }

    fn probe_process(&mut self, pid: u32) -> Probe<ProcessInfo> {
        match self.provider.process(pid) {
            Ok(reading) => Probe::Read(reading.into()),
            Err(err) => {
                debug!(pid, error = %err, "skipping process");
                Probe::Skip
            }
        }
    }
}

impl From<ProcessReading> for ProcessInfo {
    fn from(r: ProcessReading) -> Self {
        Self {
            pid: r.pid,
            name: r.name,
            cpu_percent: r.cpu_percent,
            memory_percent: r.memory_percent,
        }
    }
}

/// Highest cpu first, absent readings counted as zero; ties keep enumeration order.
pub fn top_processes(mut processes: Vec<ProcessInfo>, limit: usize) -> Vec<ProcessInfo> {
    processes.sort_by(|a, b| {
        let a = a.cpu_percent.unwrap_or(0.0);
        let b = b.cpu_percent.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    processes.truncate(limit);
    processes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::fake::FakeProvider;
    use crate::collectors::DiskReading;

    fn proc(pid: u32, cpu: Option<f64>) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: format!("p{pid}"),
            cpu_percent: cpu,
            memory_percent: None,
        }
    }

    fn pids(list: &[ProcessInfo]) -> Vec<u32> {
        list.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn top_processes_sorts_descending_and_truncates() {
        let list = vec![
            proc(1, Some(1.0)),
            proc(2, Some(30.0)),
            proc(3, None),
            proc(4, Some(12.5)),
            proc(5, Some(99.0)),
            proc(6, Some(0.5)),
            proc(7, Some(7.0)),
        ];
        let top = top_processes(list, 5);
        assert_eq!(pids(&top), vec![5, 2, 4, 7, 1]);
    }

    #[test]
    fn top_processes_is_stable_and_treats_absent_as_zero() {
        let list = vec![
            proc(10, Some(0.0)),
            proc(11, None),
            proc(12, Some(5.0)),
            proc(13, Some(0.0)),
            proc(14, Some(5.0)),
        ];
        let top = top_processes(list, 10);
        assert_eq!(pids(&top), vec![12, 14, 10, 11, 13]);
    }

    #[test]
    fn top_processes_with_zero_limit_is_empty() {
        assert!(top_processes(vec![proc(1, Some(3.0))], 0).is_empty());
    }

    #[test]
    fn collect_skips_denied_mounts_and_keeps_partition_order() {
        let provider = FakeProvider::new()
            .with_disk("/", DiskReading { total_bytes: 200, used_bytes: 100, free_bytes: 100 })
            .with_denied_disk("/root/secret")
            .with_disk("/boot", DiskReading { total_bytes: 100, used_bytes: 95, free_bytes: 5 })
            .with_disk("/proc", DiskReading { total_bytes: 0, used_bytes: 0, free_bytes: 0 });
        let mut collector = Collector::new(provider, CollectorSettings::default());

        let snap = collector.collect().expect("collect");
        let mounts: Vec<&str> = snap.disks.iter().map(|d| d.mount.as_str()).collect();
        assert_eq!(mounts, vec!["/", "/boot"]);
        assert_eq!(snap.disks[0].percent, 50.0);
        assert_eq!(snap.disks[1].percent, 95.0);
    }

    #[test]
    fn collect_reports_a_repeated_mount_once() {
        let provider = FakeProvider::new()
            .with_disk("/", DiskReading { total_bytes: 100, used_bytes: 95, free_bytes: 5 })
            .with_disk("/home", DiskReading { total_bytes: 100, used_bytes: 20, free_bytes: 80 })
            .with_disk("/", DiskReading { total_bytes: 100, used_bytes: 95, free_bytes: 5 });
        let mut collector = Collector::new(provider, CollectorSettings::default());

        let snap = collector.collect().expect("collect");
        let mounts: Vec<&str> = snap.disks.iter().map(|d| d.mount.as_str()).collect();
        assert_eq!(mounts, vec!["/", "/home"]);

        let alerts = crate::alerts::evaluate(&snap, &crate::config::ThresholdConfig::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "High disk usage on /: 95.0% (threshold: 90.0%)");
    }

    #[test]
    fn collect_fails_on_non_access_disk_error() {
        let provider = FakeProvider::new().with_broken_disk("/mnt/nfs");
        let mut collector = Collector::new(provider, CollectorSettings::default());
        let err = collector.collect().expect_err("must fail");
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[test]
    fn collect_skips_vanished_processes_but_counts_them() {
        let provider = FakeProvider::new()
            .with_process(1, "init", Some(0.1), Some(0.2))
            .with_vanished_process(2)
            .with_denied_process(3)
            .with_process(4, "busy", Some(75.0), Some(3.0))
            .with_process(5, "idle", None, None);
        let mut collector = Collector::new(
            provider,
            CollectorSettings {
                cpu_window: Duration::ZERO,
                top_limit: 2,
            },
        );

        let snap = collector.collect().expect("collect");
        assert_eq!(snap.process_count, 5);
        assert_eq!(pids(&snap.top_processes), vec![4, 1]);
        assert_eq!(snap.top_processes[0].name, "busy");
    }

    #[test]
    fn collect_passes_cpu_window_and_memory_through() {
        let gib = 1024 * 1024 * 1024;
        let provider = FakeProvider::new()
            .with_cpu(42.5)
            .with_memory(16 * gib, 4 * gib, 12 * gib);
        let window = Duration::from_millis(250);
        let mut collector = Collector::new(
            provider,
            CollectorSettings {
                cpu_window: window,
                top_limit: 5,
            },
        );

        let snap = collector.collect().expect("collect");
        assert_eq!(snap.cpu_percent, 42.5);
        assert_eq!(snap.memory.percent, 25.0);
        assert_eq!(snap.memory.total_gb, 16.0);
        assert_eq!(collector.provider().cpu_windows(), vec![window]);
    }
}
