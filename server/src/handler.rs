use std::{net::SocketAddr, sync::Arc, time::Duration};

use warp::{reject::Rejection, ws::Ws, Reply};

use crate::{buses, storage::BusStorage, webclients};

pub async fn bus_ws_handler(ws: Ws, peer: Option<SocketAddr>, storage: Arc<BusStorage>) -> Result<impl Reply, Rejection> {
    Ok(ws.on_upgrade(move |socket| buses::bus_connection_process(socket, peer, storage)))
}

pub async fn webclient_ws_handler(
    ws: Ws,
    peer: Option<SocketAddr>,
    storage: Arc<BusStorage>,
    interval: Duration,
) -> Result<impl Reply, Rejection> {
    Ok(ws.on_upgrade(move |socket| webclients::webclient_connection_process(socket, peer, storage, interval)))
}
