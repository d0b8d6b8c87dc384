//! Endpoint Monitor Entry Point

use clap::Parser;
use endpoint_monitor::cli::Cli;
use endpoint_monitor::logging::{self, LoggingOptions};
use endpoint_monitor::scheduler::log_availability;
use endpoint_monitor::shutdown::{listen_for_signals, ShutdownController};
use endpoint_monitor_common::config::load_endpoints;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.monitor_config();

    let _log_guards = match logging::init(&LoggingOptions {
        log_dir: config.log_dir.clone(),
        console_level: cli.log_level,
    }) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Application starting");

    let endpoints = match load_endpoints(&cli.config) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        count = endpoints.len(),
        config = %cli.config.display(),
        "Loaded endpoints"
    );

    let shutdown = ShutdownController::default();
    let signal_task = tokio::spawn(listen_for_signals(shutdown.clone()));

    let result = endpoint_monitor::run(endpoints, &config, cli.max_cycles, shutdown.clone()).await;

    let interrupted = shutdown.is_shutdown_requested();
    shutdown.request_shutdown();
    let _ = signal_task.await;

    match result {
        Ok(stats) => {
            info!("Final availability:");
            log_availability(&stats);
            if interrupted {
                println!("\nMonitoring stopped by user.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to start monitoring: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
