//! Docker Stats Exporter: a per-host collector that reads the resource usage of
//! all running containers from the container runtime daemon and serves it as
//! JSON on `GET /metrics`.
//!
//! Every scrape triggers one collection pass: list the running containers, fetch
//! a single stats snapshot per container, derive the CPU percentage and report
//! memory and network counters. Failures are confined to the container they
//! occurred for.

use std::sync::Arc;

pub mod api;
pub mod collector;
pub mod config;
pub mod container;
pub mod discovery;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod stats;

/// Runs the exporter until it receives ctrl-c.
///
/// Reads the [`config::Config`] from the environment, connects the collector
/// to the runtime socket and serves the metrics API.
///
/// # Errors
///
/// Returns an error if the API server cannot bind its listen address or fails
/// while serving.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::from_env();
    log::debug!("Final config: {:?}", config);
    if !config.socket_path.exists() {
        log::warn!(
            "Runtime socket `{}` does not exist (yet), scrapes will report connection failures",
            config.socket_path.display()
        );
    }

    let client = runtime::UnixSocketClient::new(&config.socket_path, config.request_timeout);
    let collector = Arc::new(collector::Collector::new(
        client,
        config.max_concurrent_fetches,
    ));

    let api = api::APIServer::new(collector);
    api.listen(config.listen_addr, shutdown_signal()).await?;
    log::info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received ctrl-c, shutting down"),
        Err(err) => {
            log::error!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await
        }
    }
}
