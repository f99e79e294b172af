mod alerts;
mod collectors;
mod config;
mod monitor;
mod report;
mod sink;
mod state;

use clap::Parser;
use collectors::snapshot::{Collector, CollectorSettings};
use collectors::system::SysinfoProvider;
use config::ThresholdConfig;
use monitor::Monitor;
use sink::{AlertLog, Journal};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hostwatch", about = "System health monitor")]
#[command(version)]
struct Cli {
    /// Threshold file; defaults are used when it does not exist.
    #[arg(long, default_value = "./monitor_config.json")]
    config: String,
    /// Run a single check and exit.
    #[arg(long)]
    once: bool,
    /// Run a single check and print the detailed report.
    #[arg(long)]
    report: bool,
    /// Seconds between checks in continuous mode.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,
    /// Number of processes listed in the report.
    #[arg(long, default_value_t = 5)]
    top: usize,
    #[arg(long, default_value = "./system_health.log")]
    log_file: String,
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", ThresholdConfig::example_json());
        return;
    }

    let thresholds = match ThresholdConfig::load_from_file(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let journal = match Journal::open(&cli.log_file) {
        Ok(journal) => journal,
        Err(err) => {
            error!(error = %err, "failed to open alert log");
            std::process::exit(1);
        }
    };

    let collector = Collector::new(
        SysinfoProvider::new(),
        CollectorSettings {
            top_limit: cli.top,
            ..CollectorSettings::default()
        },
    );
    let mut monitor = Monitor::new(
        collector,
        thresholds,
        AlertLog::new(journal, std::io::stdout()),
    );

    if cli.once || cli.report {
        match monitor.run_once(cli.report) {
            Ok(cycle) => info!(
                alerts = cycle.alerts.len(),
                cpu_percent = cycle.snapshot.cpu_percent,
                process_count = cycle.snapshot.process_count,
                "single check finished"
            ),
            Err(err) => {
                error!(error = %err, "failed to collect metrics");
                std::process::exit(1);
            }
        }
        return;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(err) => error!(error = %err, "failed to listen for Ctrl+C"),
        }
    });
    // Let the listener task register the handler before the first cycle blocks.
    tokio::task::yield_now().await;

    if let Err(err) = monitor
        .run_continuous(Duration::from_secs(cli.interval), shutdown_rx)
        .await
    {
        error!(error = %err, "failed to collect metrics");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
