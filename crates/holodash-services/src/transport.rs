use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, instrument};

use crate::{ChannelError, Result};

/// What the transport delivers to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    /// The remote sent a close frame
    Closed,
    /// Binary, ping and pong frames; carry nothing for the dashboard
    Other,
}

/// Inbound events of one live connection; the stream ending means closed.
pub type EventStream = BoxStream<'static, Result<TransportEvent>>;

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<EventStream>;
}

/// WebSocket transport over tokio-tungstenite
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    #[instrument(skip(self))]
    async fn connect(&self, endpoint: &str) -> Result<EventStream> {
        let (stream, response) =
            connect_async(endpoint)
                .await
                .map_err(|e| ChannelError::Connect {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;
        debug!(status = %response.status(), "WebSocket handshake complete");

        let events = stream.map(|frame| match frame {
            Ok(Message::Text(text)) => Ok(TransportEvent::Text(text)),
            Ok(Message::Close(_)) => Ok(TransportEvent::Closed),
            Ok(_) => Ok(TransportEvent::Other),
            Err(e) => Err(ChannelError::from(e)),
        });

        Ok(events.boxed())
    }
}
