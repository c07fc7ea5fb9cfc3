use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
