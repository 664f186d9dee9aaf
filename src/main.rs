// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! DrowseWatch console driver
//!
//! Runs the monitoring core headless and takes line commands on stdin:
//! `start`, `stop`, `alert`, `hide`, `show`, `status`, `quit`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use drowsewatch::display::format_duration;
use drowsewatch::{Config, Monitor, VERSION};

/// DrowseWatch - drowsiness monitoring session supervisor
#[derive(Parser, Debug)]
#[command(name = "drowsewatch")]
#[command(version = VERSION)]
#[command(about = "Supervise a drowsiness monitoring session from the terminal")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Demo mode with a simulated camera that always grants access
    #[arg(long)]
    demo: bool,

    /// Base URL of the site receiving alert reports
    #[arg(long)]
    endpoint: Option<String>,

    /// Raw cookie header to take the anti-forgery token from
    #[arg(long)]
    cookies: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("DrowseWatch v{}", VERSION);

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    if args.demo {
        config.demo_mode = true;
    }
    if let Some(endpoint) = args.endpoint {
        config.reporting.base_url = endpoint;
    }
    if let Some(cookies) = args.cookies {
        config.reporting.cookies = Some(cookies);
    }

    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.demo_mode);
    info!("Reporting alerts to {}", config.reporting.alert_url());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let monitor = Arc::new(Monitor::builder(config).build()?);
    monitor.start_ticker();

    info!("Commands: start | stop | alert | hide | show | status | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !dispatch(&monitor, line.trim()).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if let Some(warning) = monitor.leave_warning() {
        warn!("{}", warning);
        monitor.stop();
    }
    monitor.shutdown().await;
    info!("DrowseWatch shutdown complete");
    Ok(())
}

/// Handle one command; false means quit
async fn dispatch(monitor: &Monitor, command: &str) -> bool {
    match command {
        "start" => {
            if let Err(e) = monitor.start().await {
                warn!("Session not started: {}", e);
            }
        }
        "stop" => monitor.stop(),
        "alert" => {
            monitor.on_drowsiness_detected();
        }
        "hide" => monitor.set_page_hidden(true),
        "show" => monitor.set_page_hidden(false),
        "status" => {
            let state = monitor.snapshot();
            let elapsed = monitor
                .refresh()
                .map(|p| format_duration(p.elapsed_seconds))
                .unwrap_or_else(|| "--:--:--".to_string());
            info!(
                "{:?} | elapsed {} | alerts {}",
                state.phase(),
                elapsed,
                state.alert_count()
            );
        }
        "quit" | "exit" => return false,
        "" => {}
        other => warn!("Unknown command: {}", other),
    }
    true
}
