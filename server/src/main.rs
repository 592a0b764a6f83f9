use std::sync::Arc;

use anyhow::Context;
use bus_server::{BusStorage, Server, ServerConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = ServerConfig::from_env();
    info!(
        buses_addr = %config.buses_addr,
        webclients_addr = %config.webclients_addr,
        broadcast_interval_ms = config.broadcast_interval.as_millis(),
        "configuration loaded"
    );

    let storage = Arc::new(BusStorage::new());
    let shutdown = CancellationToken::new();
    let server = Server::bind(&config, storage, shutdown.clone()).context("unable to start server")?;

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("caught shutdown signal");
        shutdown.cancel();
    });

    server.wait().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("unable to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("unable to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
