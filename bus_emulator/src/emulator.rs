use std::sync::Arc;

use msgs::RouteInfo;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    bus::{bus_id, random_offset, run_bus},
    config::EmulatorConfig,
    sender::run_sender,
};

/// Fans every simulated bus into a small fixed pool of server connections.
pub struct Emulator {
    config: EmulatorConfig,
    token: CancellationToken,
}

impl Emulator {
    pub fn new(config: EmulatorConfig, token: CancellationToken) -> Emulator {
        Emulator { config, token }
    }

    /// Spawns the sender pool and `buses_per_route` buses on each route, then
    /// waits until all of them have stopped.
    pub async fn run(&self, routes: Vec<RouteInfo>) {
        let (buses_tx, buses_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let buses_rx = Arc::new(Mutex::new(buses_rx));
        let mut tasks = JoinSet::new();

        for sender_id in 0..self.config.connections_count {
            tasks.spawn(run_sender(
                sender_id,
                self.config.server_url.clone(),
                buses_rx.clone(),
                self.token.clone(),
                self.config.retry_delay,
            ));
        }

        let routes: Vec<Arc<RouteInfo>> = routes.into_iter().map(Arc::new).collect();
        let mut index = 0;
        for _ in 0..self.config.buses_per_route {
            for route in &routes {
                let id = bus_id(&route.name, index);
                index += 1;
                tasks.spawn(run_bus(
                    id,
                    route.clone(),
                    random_offset(route.coordinates.len()),
                    self.config.step_interval,
                    buses_tx.clone(),
                    self.token.clone(),
                ));
            }
        }
        // senders notice the channel closing once every bus is gone
        drop(buses_tx);

        info!(
            buses = index,
            connections = self.config.connections_count,
            "waiting for all tasks"
        );
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("emulator task failed: {e}");
            }
        }
        info!("emulator stopped");
    }
}
