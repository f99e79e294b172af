use crate::config::ThresholdConfig;
use crate::state::{Alert, Snapshot};

/// Checks run in a fixed order: cpu, memory, each disk in snapshot order,
/// process count. A value equal to its threshold does not alert.
pub fn evaluate(snapshot: &Snapshot, thresholds: &ThresholdConfig) -> Vec<Alert> {
    let mut out = Vec::new();

    if snapshot.cpu_percent > thresholds.cpu_percent {
        out.push(Alert::threshold_exceeded(format!(
            "High CPU usage: {:.1}% (threshold: {:.1}%)",
            snapshot.cpu_percent, thresholds.cpu_percent
        )));
    }

    if snapshot.memory.percent > thresholds.memory_percent {
        out.push(Alert::threshold_exceeded(format!(
            "High memory usage: {:.1}% (threshold: {:.1}%)",
            snapshot.memory.percent, thresholds.memory_percent
        )));
    }

    for disk in &snapshot.disks {
        if disk.percent > thresholds.disk_percent {
            out.push(Alert::threshold_exceeded(format!(
                "High disk usage on {}: {:.1}% (threshold: {:.1}%)",
                disk.mount, disk.percent, thresholds.disk_percent
            )));
        }
    }

    if snapshot.process_count as u64 > thresholds.max_processes {
        out.push(Alert::threshold_exceeded(format!(
            "High process count: {} (threshold: {})",
            snapshot.process_count, thresholds.max_processes
        )));
    }

    out
}
