//! Air Quality Monitoring Service - HTTP API
//!
//! Loads the configured tabular sources once at startup:
//! 1. Monitor readings, normalized and classified into AQI bands
//! 2. Water-footprint points
//! 3. Data-center facilities (or re-read per request, see aqmon.toml)
//!
//! and then serves read-only JSON views of them to map and dashboard clients.
//! A source that is missing or malformed is served as an empty dataset; only
//! a broken config file or an unbindable port stops the service.
//!
//! Usage:
//!   cargo run --release                          # aqmon.toml, port from PORT or 3000
//!   cargo run --release -- --port 8080           # override the port
//!   cargo run --release -- --config other.toml   # alternate configuration
//!
//! Environment:
//!   PORT        - listening port (also read from .env)
//!   AQMON_CONFIG - configuration file path (default aqmon.toml)
//!   RUST_LOG    - log filter (default info)

use aqmon_service::config::{self, ServiceConfig};
use aqmon_service::endpoint;
use aqmon_service::query::QueryService;
use log::{error, info};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🌫  Air Quality Monitoring Service");
    println!("=================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                port_override = args.get(i + 1).and_then(|p| p.parse().ok());
                if port_override.is_none() {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
                i += 2;
            }
            "--config" => {
                config_path = args.get(i + 1).cloned();
                if config_path.is_none() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT] [--config PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let loaded = match &config_path {
        Some(path) => config::load_config_from(Path::new(path)),
        None => config::load_config(),
    };
    let mut config: ServiceConfig = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    config.apply_env();
    if let Some(port) = port_override {
        config.server.port = port;
    }

    // Load every dataset; failures degrade to empty datasets
    info!("Loading monitor, footprint and facility data...");
    let service = Arc::new(QueryService::new(&config));
    for report in service.load_all() {
        info!(
            "   {:<10} {} admitted, {} rejected",
            report.dataset, report.admitted, report.rejected
        );
    }
    info!("Data loading complete");

    if let Err(e) = endpoint::start_endpoint_server(
        config.server.port,
        service,
        config.server.workers,
        config.server.allow_reload,
    ) {
        error!("Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
