use tokio_tungstenite::tungstenite;

/// Failures of one outbound connection. The cause is part of the message and
/// is not repeated as a source.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    #[error("unable to connect to server: {0}")]
    Connect(tungstenite::Error),
    #[error("unable to send message to server: {0}")]
    Send(tungstenite::Error),
    #[error("unable to encode bus info: {0}")]
    Encode(serde_json::Error),
}
