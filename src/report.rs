use crate::state::Snapshot;
use std::fmt::Write;

pub fn format_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, snapshot);
    out
}

fn write_report(out: &mut String, s: &Snapshot) -> std::fmt::Result {
    writeln!(out, "=== SYSTEM HEALTH REPORT ===")?;
    writeln!(out, "Timestamp: {}", s.captured_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;
    writeln!(out, "CPU Usage: {:.1}%", s.cpu_percent)?;
    writeln!(
        out,
        "Memory Usage: {:.1}% ({:.2} GB / {:.2} GB)",
        s.memory.percent, s.memory.used_gb, s.memory.total_gb
    )?;
    writeln!(out)?;

    writeln!(out, "Disk Usage:")?;
    for d in &s.disks {
        writeln!(
            out,
            "  {}: {:.1}% ({:.2} GB / {:.2} GB)",
            d.mount, d.percent, d.used_gb, d.total_gb
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Running Processes: {}", s.process_count)?;
    writeln!(out)?;

    writeln!(out, "Top {} Processes by CPU:", s.top_processes.len())?;
    for p in &s.top_processes {
        writeln!(
            out,
            "  PID {}: {} - CPU: {:.1}%, Memory: {:.1}%",
            p.pid,
            p.name,
            p.cpu_percent.unwrap_or(0.0),
            p.memory_percent.unwrap_or(0.0)
        )?;
    }
    Ok(())
}
