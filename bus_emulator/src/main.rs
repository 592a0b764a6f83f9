use anyhow::{bail, Context};
use bus_emulator::{Emulator, EmulatorConfig};
use msgs::RouteInfo;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = EmulatorConfig::from_env();
    info!(
        server_url = %config.server_url,
        connections_count = config.connections_count,
        buses_per_route = config.buses_per_route,
        routes_dir = %config.routes_dir.display(),
        "configuration loaded"
    );

    let routes = RouteInfo::load_dir(&config.routes_dir)
        .with_context(|| format!("unable to load routes from {}", config.routes_dir.display()))?;
    if routes.is_empty() {
        bail!("no route files found in {}", config.routes_dir.display());
    }
    info!(routes = routes.len(), "routes loaded");

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("caught shutdown signal");
        signal_token.cancel();
    });

    Emulator::new(config, token).run(routes).await;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. A listener that cannot be installed never
/// resolves, so it cannot trigger a shutdown by itself.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("unable to listen for ctrl-c: {e}");
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
                error!("unable to listen for SIGTERM: {e}");
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
