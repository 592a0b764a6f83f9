use std::{net::SocketAddr, sync::Arc};

use futures::StreamExt;
use msgs::BusInfo;
use tracing::{debug, info, warn};
use warp::ws::WebSocket;

use crate::storage::BusStorage;

/// Ingests position updates from one publisher connection until it closes.
///
/// Undecodable messages are logged and skipped; only a transport failure or a
/// close frame ends the loop.
pub async fn bus_connection_process(mut ws: WebSocket, peer: Option<SocketAddr>, storage: Arc<BusStorage>) {
    info!(?peer, "publisher connected");

    while let Some(result) = ws.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!(?peer, "error receiving bus message: {e}");
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        if !msg.is_text() && !msg.is_binary() {
            continue;
        }

        let bus = match serde_json::from_slice::<BusInfo>(msg.as_bytes()) {
            Ok(bus) => bus,
            Err(e) => {
                warn!(?peer, "unable to parse bus message: {e}");
                continue;
            }
        };
        debug!(bus_id = %bus.id, lat = bus.lat, lng = bus.lng, "bus position received");
        storage.add(bus).await;
    }

    info!(?peer, "publisher disconnected");
}
