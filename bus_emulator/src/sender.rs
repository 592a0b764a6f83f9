use std::{sync::Arc, time::Duration};

use futures::SinkExt;
use msgs::BusInfo;
use tokio::{
    net::TcpStream,
    sync::{mpsc, Mutex},
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::SenderError;

/// Receiving end of the bus channel, shared by every sender of the pool.
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<BusInfo>>>;

type ServerStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Stop {
    Cancelled,
    ChannelClosed,
}

/// One connection of the outbound pool.
///
/// Connects to `server_url` and forwards buses from the shared channel until
/// the connection fails, then waits `retry_delay` and reconnects. A bus that
/// was taken from the channel but could not be written is dropped; its next
/// position supersedes it. Returns once `token` is cancelled or every bus has
/// stopped.
pub async fn run_sender(
    sender_id: usize,
    server_url: String,
    buses: SharedReceiver,
    token: CancellationToken,
    retry_delay: Duration,
) {
    info!(sender_id, "start sender");

    loop {
        let outcome = match connect(&server_url, &token).await {
            Ok(Some(mut ws)) => {
                info!(sender_id, %server_url, "connected to server");
                send_forever(&mut ws, &buses, &token).await
            }
            Ok(None) => Ok(Stop::Cancelled),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Stop::Cancelled) => break,
            Ok(Stop::ChannelClosed) => {
                info!(sender_id, "no buses left to send");
                break;
            }
            Err(e) => warn!(sender_id, "{e}"),
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(retry_delay) => {}
        }
    }

    info!(sender_id, "stop sender");
}

async fn connect(server_url: &str, token: &CancellationToken) -> Result<Option<ServerStream>, SenderError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Ok(None),
        result = connect_async(server_url) => {
            let (ws, _) = result.map_err(SenderError::Connect)?;
            Ok(Some(ws))
        }
    }
}

async fn send_forever(ws: &mut ServerStream, buses: &SharedReceiver, token: &CancellationToken) -> Result<Stop, SenderError> {
    loop {
        let bus = tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(Stop::Cancelled),
            bus = next_bus(buses) => match bus {
                Some(bus) => bus,
                None => return Ok(Stop::ChannelClosed),
            },
        };

        let json = serde_json::to_string(&bus).map_err(SenderError::Encode)?;

        // a peer that stops reading parks the write, so it races cancellation too
        tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(Stop::Cancelled),
            result = ws.send(Message::Text(json)) => result.map_err(SenderError::Send)?,
        }
    }
}

/// The lock is held only while waiting, so whichever sender is idle first
/// takes the next bus.
async fn next_bus(buses: &SharedReceiver) -> Option<BusInfo> {
    buses.lock().await.recv().await
}
