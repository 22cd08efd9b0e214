use std::time::Duration;

use wattwatch_gateway::ConnectionStatus;
use wattwatch_monitor::{Monitor, MonitorConfig, URL_ENV_VAR, load_config, load_default_config};

fn print_help() {
    eprintln!(
        r#"wattwatch - live monitor for the BESS energy auction backend

USAGE:
    wattwatch [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --url <URL>         Backend WebSocket endpoint (overrides config and env)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    {url_var}    Backend WebSocket endpoint (default: ws://localhost:8080/ws)
    RUST_LOG            Log level filter (default: wattwatch=info)

EXAMPLES:
    # Run with defaults
    wattwatch

    # Run with config file
    wattwatch --config monitor.json

    # Point at another backend
    {url_var}=ws://10.0.0.5:8080/ws wattwatch
"#,
        url_var = URL_ENV_VAR
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("wattwatch=info"))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut url: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--url" | "-u" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --url requires an endpoint argument");
                    std::process::exit(1);
                }
                url = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config: MonitorConfig = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            load_config(&path)?
        }
        None => {
            log::info!("Using default configuration");
            load_default_config()?
        }
    };
    config.apply_env_overrides();
    if let Some(url) = url {
        config.connection.url = url;
    }
    config.validate()?;

    log::info!("Backend: {}", config.connection.url);
    log::info!(
        "Reconnect: every {} ms, up to {} attempts",
        config.connection.reconnect_interval_ms,
        config.connection.max_reconnect_attempts
    );

    let summary_every = Duration::from_millis(config.summary_interval_ms.max(1));
    let mut monitor = Monitor::new(config);
    monitor.start();

    let mut summary_tick = tokio::time::interval(summary_every);
    let mut status_tick = tokio::time::interval(Duration::from_millis(250));
    let mut last_status = ConnectionStatus::Disconnected;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Ctrl-C received, shutting down");
                break;
            }
            _ = status_tick.tick() => {
                let state = monitor.connection_state();
                if state.status != last_status {
                    match &state.last_error {
                        Some(error) => log::info!("Connection {} ({})", state.status, error),
                        None => log::info!("Connection {}", state.status),
                    }
                    last_status = state.status;
                    log::info!("{}", monitor.snapshot().summary);
                }
            }
            _ = summary_tick.tick() => {
                let snapshot = monitor.snapshot();
                let stats = monitor.pipeline_stats();
                log::info!(
                    "{} | frames {} applied {} dropped {}",
                    snapshot.summary,
                    stats.frames_received,
                    stats.events_applied,
                    stats.frames_dropped
                );
            }
        }
    }

    monitor.shutdown().await;
    Ok(())
}
