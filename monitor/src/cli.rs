//! CLI module for endpoint-monitor
//!
//! Parses the endpoint file path and monitoring options.

use clap::Parser;
use endpoint_monitor_common::config::{
    MonitorConfig, DEFAULT_CONCURRENCY, DEFAULT_CYCLE_PERIOD_SECS, DEFAULT_LOG_DIR,
    DEFAULT_MAX_LATENCY_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Endpoint monitor - periodic HTTP health checks with per-domain availability
#[derive(Parser, Debug)]
#[command(name = "endpoint-monitor")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    ENDPOINT_MONITOR_LOG_DIR          Log directory (default: logs)
    ENDPOINT_MONITOR_LOG_LEVEL        Console log level (default: info)
    ENDPOINT_MONITOR_INTERVAL_SECS    Target cycle period in seconds (default: 15)
    ENDPOINT_MONITOR_TIMEOUT_MS       Per-request timeout in milliseconds (default: 1000)
    ENDPOINT_MONITOR_MAX_LATENCY_MS   Latency threshold for UP in milliseconds (default: 500)
    ENDPOINT_MONITOR_CONCURRENCY      Concurrent checks per cycle (default: 1)
    RUST_LOG                          Overrides the console log filter
"#)]
pub struct Cli {
    /// YAML file listing the endpoints to monitor
    #[arg(value_name = "CONFIG_FILE")]
    pub config: PathBuf,

    /// Directory for monitor.log, error.log and debug.log
    #[arg(long, default_value = DEFAULT_LOG_DIR, env = "ENDPOINT_MONITOR_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Console log level
    #[arg(long, default_value = "info", env = "ENDPOINT_MONITOR_LOG_LEVEL")]
    pub log_level: LevelFilter,

    /// Target cycle period in seconds
    #[arg(long, default_value_t = DEFAULT_CYCLE_PERIOD_SECS, env = "ENDPOINT_MONITOR_INTERVAL_SECS")]
    pub interval_secs: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_MS, env = "ENDPOINT_MONITOR_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Responses at or above this latency (milliseconds) count as DOWN
    #[arg(long, default_value_t = DEFAULT_MAX_LATENCY_MS, env = "ENDPOINT_MONITOR_MAX_LATENCY_MS")]
    pub max_latency_ms: u64,

    /// Number of endpoints checked concurrently within a cycle
    #[arg(
        long,
        default_value_t = DEFAULT_CONCURRENCY as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "ENDPOINT_MONITOR_CONCURRENCY"
    )]
    pub concurrency: u64,

    /// Stop after this many cycles (runs until interrupted when omitted)
    #[arg(long)]
    pub max_cycles: Option<u64>,
}

impl Cli {
    /// Build the monitor configuration from the parsed arguments.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            cycle_period_secs: self.interval_secs,
            request_timeout_ms: self.timeout_ms,
            max_latency_ms: self.max_latency_ms,
            concurrency: usize::try_from(self.concurrency).unwrap_or(usize::MAX),
            log_dir: self.log_dir.clone(),
        }
    }
}
