use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures::{FutureExt, StreamExt};
use msgs::{BBoxMessage, BusesListMessage, ErrorMessage};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::{error::ServerError, storage::BusStorage, viewport::Viewport};

type ClientSender = mpsc::Sender<Result<Message, warp::Error>>;

/// Frames waiting for the socket writer. Kept at one so a client that stops
/// reading blocks its own send loop instead of queueing snapshots.
const OUTBOUND_CAPACITY: usize = 1;

/// Serves one web client: streams the buses inside its viewport every
/// `interval` while accepting viewport updates from the same socket.
///
/// The socket writer, the receive loop and the send loop are raced against
/// each other. Whichever stops first (write failure, read failure or client
/// close) ends the connection and drops the other two.
pub async fn webclient_connection_process(
    ws: WebSocket,
    peer: Option<SocketAddr>,
    storage: Arc<BusStorage>,
    interval: Duration,
) {
    let id = Uuid::new_v4().as_simple().to_string();
    let span = tracing::info_span!("webclient", %id);

    async move {
        info!(?peer, "connection accepted");

        let (webclient_ws_sender, webclient_ws_rcv) = ws.split();
        let (to_webclient, webclient_rcv) = mpsc::channel(OUTBOUND_CAPACITY);

        let forward = ReceiverStream::new(webclient_rcv)
            .forward(webclient_ws_sender)
            .map(|result| {
                if let Err(e) = result {
                    debug!("error sending websocket msg: {e}");
                }
            });

        let viewport = Viewport::new();

        tokio::select! {
            _ = forward => debug!("sender stopped"),
            _ = receive_bounds(webclient_ws_rcv, &viewport, to_webclient.clone()) => debug!("receiver stopped"),
            _ = send_buses(&storage, &viewport, to_webclient, interval) => debug!("broadcast stopped"),
        }

        info!("connection closed");
    }
    .instrument(span)
    .await
}

async fn receive_bounds(
    mut webclient_ws_rcv: futures::stream::SplitStream<WebSocket>,
    viewport: &Viewport,
    to_webclient: ClientSender,
) {
    while let Some(result) = webclient_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                debug!("error receiving websocket msg: {e}");
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        if !msg.is_text() && !msg.is_binary() {
            continue;
        }

        let bbox_msg = match serde_json::from_slice::<BBoxMessage>(msg.as_bytes()) {
            Ok(bbox_msg) => bbox_msg,
            Err(e) => {
                warn!("invalid bounds message: {e}");
                let reply = ErrorMessage::new(vec!["invalid json".to_owned()]);
                if let Err(e) = send_json(&to_webclient, &reply).await {
                    debug!("unable to report error: {e}");
                    break;
                }
                continue;
            }
        };
        debug!(bounds = ?bbox_msg.data, "received new bounds");
        viewport.update(bbox_msg.data).await;
    }
}

async fn send_buses(storage: &BusStorage, viewport: &Viewport, to_webclient: ClientSender, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let bounds = viewport.bounds().await;
        let buses = storage.list(|lat, lng| bounds.contains(lat, lng)).await;
        if let Err(e) = send_json(&to_webclient, &BusesListMessage::new(buses)).await {
            debug!("unable to send buses: {e}");
            break;
        }
    }
}

/// Waits for room in the outbound queue, i.e. for the socket to drain.
async fn send_json(to_webclient: &ClientSender, msg: &impl Serialize) -> Result<(), ServerError> {
    let json = serde_json::to_string(msg).map_err(ServerError::Encode)?;
    to_webclient
        .send(Ok(Message::text(json)))
        .await
        .map_err(|_| ServerError::ClientGone)
}
