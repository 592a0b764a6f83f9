use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("unable to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: warp::Error,
    },
    #[error("unable to encode message: {0}")]
    Encode(serde_json::Error),
    #[error("web client disconnected")]
    ClientGone,
}
