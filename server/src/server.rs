use std::{net::SocketAddr, sync::Arc};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{config::ServerConfig, error::ServerError, routes, storage::BusStorage};

/// Both listeners, bound and serving in the background.
pub struct Server {
    pub buses_addr: SocketAddr,
    pub webclients_addr: SocketAddr,
    tasks: JoinSet<()>,
}

impl Server {
    /// Binds the publisher and web client listeners on top of one shared
    /// `storage`. Once `shutdown` is cancelled neither listener accepts new
    /// connections.
    pub fn bind(config: &ServerConfig, storage: Arc<BusStorage>, shutdown: CancellationToken) -> Result<Server, ServerError> {
        let mut tasks = JoinSet::new();

        let (buses_addr, buses_server) = warp::serve(routes::bus_route(storage.clone()))
            .try_bind_with_graceful_shutdown(config.buses_addr, cancelled(shutdown.clone()))
            .map_err(|source| ServerError::Bind { addr: config.buses_addr, source })?;
        tasks.spawn(async move {
            info!(%buses_addr, "starting buses server");
            buses_server.await;
            info!("buses server stopped");
        });

        let (webclients_addr, webclients_server) =
            warp::serve(routes::webclients_route(storage, config.broadcast_interval))
                .try_bind_with_graceful_shutdown(config.webclients_addr, cancelled(shutdown))
                .map_err(|source| ServerError::Bind { addr: config.webclients_addr, source })?;
        tasks.spawn(async move {
            info!(%webclients_addr, "starting webclients server");
            webclients_server.await;
            info!("webclients server stopped");
        });

        Ok(Server { buses_addr, webclients_addr, tasks })
    }

    /// Waits until both listeners have shut down.
    pub async fn wait(mut self) {
        while self.tasks.join_next().await.is_some() {}
    }
}

async fn cancelled(token: CancellationToken) {
    token.cancelled().await
}
