use crate::alerts::evaluate;
use crate::collectors::snapshot::Collector;
use crate::collectors::{MetricsProvider, ProviderError};
use crate::config::ThresholdConfig;
use crate::report::format_report;
use crate::sink::{AlertSink, StatusLog};
use crate::state::{Alert, Snapshot};
use chrono::Local;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Elapsed,
    Cancelled,
}

/// Waits for `period` unless `shutdown` flips to `true` first. A dropped
/// sender means nobody can cancel any more, so the full period is slept.
pub async fn pause(period: Duration, shutdown: &mut watch::Receiver<bool>) -> Pause {
    if *shutdown.borrow_and_update() {
        return Pause::Cancelled;
    }

    let sleep = time::sleep(period);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return Pause::Elapsed,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow_and_update() => return Pause::Cancelled,
                Ok(()) => continue,
                Err(_) => {
                    (&mut sleep).await;
                    return Pause::Elapsed;
                }
            },
        }
    }
}

pub struct Cycle {
    pub snapshot: Snapshot,
    pub alerts: Vec<Alert>,
    pub report: Option<String>,
}

pub struct Monitor<P, S> {
    collector: Collector<P>,
    thresholds: ThresholdConfig,
    sink: S,
}

impl<P, S> Monitor<P, S>
where
    P: MetricsProvider,
    S: AlertSink + StatusLog,
{
    pub fn new(collector: Collector<P>, thresholds: ThresholdConfig, sink: S) -> Self {
        Self {
            collector,
            thresholds,
            sink,
        }
    }

    /// collect → evaluate → dispatch, optionally rendering the report.
    pub fn run_cycle(&mut self, render_report: bool) -> Result<Cycle, ProviderError> {
        let snapshot = self.collector.collect()?;
        let alerts = evaluate(&snapshot, &self.thresholds);
        for alert in &alerts {
            self.sink.dispatch(alert);
        }
        let report = render_report.then(|| format_report(&snapshot));
        self.sink.notice("System health check completed");

        Ok(Cycle {
            snapshot,
            alerts,
            report,
        })
    }

    pub fn run_once(&mut self, print_report: bool) -> Result<Cycle, ProviderError> {
        let cycle = self.run_cycle(print_report)?;
        if let Some(report) = &cycle.report {
            self.sink.say(report.trim_end());
        }
        Ok(cycle)
    }

    /// Runs cycles until `shutdown` is set. Cancellation is only observed
    /// between cycles; a cycle in progress always completes.
    pub async fn run_continuous(
        &mut self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), ProviderError> {
        self.sink.notice(&format!(
            "Starting continuous monitoring (interval: {}s)",
            interval.as_secs()
        ));
        self.sink.notice(&format!("Thresholds: {}", self.thresholds));

        loop {
            let cycle = self.run_cycle(false)?;
            if cycle.alerts.is_empty() {
                self.sink.say(&format!(
                    "✅ System healthy - {}",
                    Local::now().format("%H:%M:%S")
                ));
            }

            if pause(interval, &mut shutdown).await == Pause::Cancelled {
                self.sink.notice("Monitoring stopped by user");
                self.sink.say("\n🛑 Monitoring stopped");
                return Ok(());
            }
        }
    }
}
