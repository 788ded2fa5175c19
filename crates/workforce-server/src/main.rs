// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! workforce-server: HTTP/SSE front door for a workforce orchestration
//! session.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use workforce_core::SystemClock;
use workforce_server::state::default_provider_factory;
use workforce_server::{http, AppState, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("workforce-server {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("workforce-server {}", env!("CARGO_PKG_VERSION"));
                println!("HTTP/SSE front door for a workforce orchestration session.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -V, --version    Print version information");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: workforce-server [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let _guard = setup_logging();

    let config = RuntimeConfig::load();
    let bind_addr = config.bind_addr.clone();
    info!(%bind_addr, "starting workforce-server");

    let state = AppState::new(config, Arc::new(SystemClock), default_provider_factory());
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("received SIGINT, shutting down"),
            }
        })
        .await?;

    info!("workforce-server stopped");
    Ok(())
}

/// Structured logging to stdout, filtered by `RUST_LOG` (defaulting to
/// `info`). This process has no long-lived log file to rotate — it runs
/// under a supervisor that captures stdout — so no `tracing-appender` file
/// sink is wired up; the dependency stays for deployments that want to swap
/// in a rolling file writer.
fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}
