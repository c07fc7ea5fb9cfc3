use std::sync::Arc;

use futures::StreamExt;
use holodash_core::{render, DashboardConfig, DisplaySurface, InboundMessage, MetricsStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::state::{ChannelStateMachine, Reconnect};
use crate::transport::{Connector, TransportEvent, WsConnector};
use crate::ChannelError;

/// What happened to one inbound text frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Greeting from the source; nothing merged, nothing rendered
    Handshake,
    /// Merged and rendered; `changed` is false when every value was already current
    Applied { changed: bool },
    /// Not a JSON object; logged and dropped
    Discarded,
}

/// Owns the telemetry connection, the snapshot and the display surface.
///
/// Messages are handled one at a time in arrival order, so each
/// merge + render finishes before the next frame is read.
pub struct ChannelManager<S: DisplaySurface> {
    config: DashboardConfig,
    connector: Arc<dyn Connector>,
    machine: ChannelStateMachine,
    store: MetricsStore,
    surface: S,
}

impl<S: DisplaySurface> ChannelManager<S> {
    pub fn new(config: DashboardConfig, connector: Arc<dyn Connector>, surface: S) -> Self {
        let machine = ChannelStateMachine::new(config.reconnect_delay());
        Self {
            config,
            connector,
            machine,
            store: MetricsStore::new(),
            surface,
        }
    }

    /// Manager over a real WebSocket connection
    pub fn websocket(config: DashboardConfig, surface: S) -> Self {
        Self::new(config, Arc::new(WsConnector), surface)
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn machine(&self) -> &ChannelStateMachine {
        &self.machine
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Connect, and keep reconnecting at the fixed delay until `cancel` fires.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!(
            delay_ms = self.config.reconnect_delay_ms,
            "Starting telemetry channel"
        );

        loop {
            let attempt = self.connect();

            let reconnect = tokio::select! {
                _ = cancel.cancelled() => break,
                reconnect = self.connect_once(attempt) => reconnect,
            };

            // Every attempt ends in exactly one wait, even if its close was
            // already handled elsewhere.
            let delay = reconnect.map_or_else(|| self.config.reconnect_delay(), |r| r.delay);

            info!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Reconnecting after delay"
            );
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Telemetry channel stopped");
    }

    /// Begin a new connection attempt and show it on the status indicator.
    pub fn connect(&mut self) -> u64 {
        let attempt = self.machine.begin_connect();
        debug!(attempt, "Connecting");
        self.surface.set_status(self.machine.status());
        attempt
    }

    async fn connect_once(&mut self, attempt: u64) -> Option<Reconnect> {
        let connector = Arc::clone(&self.connector);
        let mut events = match connector.connect(&self.config.endpoint).await {
            Ok(events) => events,
            Err(e) => {
                self.handle_error(attempt, &e);
                return self.handle_close(attempt);
            }
        };

        self.handle_open(attempt);

        while let Some(event) = events.next().await {
            match event {
                Ok(TransportEvent::Text(text)) => {
                    self.handle_text(&text);
                }
                Ok(TransportEvent::Closed) => break,
                Ok(TransportEvent::Other) => {}
                Err(e) => {
                    self.handle_error(attempt, &e);
                    break;
                }
            }
        }

        self.handle_close(attempt)
    }

    pub fn handle_open(&mut self, attempt: u64) {
        if self.machine.on_open(attempt) {
            info!(attempt, "Telemetry channel connected");
            self.surface.set_status(self.machine.status());
        }
    }

    pub fn handle_error(&mut self, attempt: u64, err: &ChannelError) {
        error!(attempt, "Telemetry channel error: {}", err);
        if self.machine.on_error(attempt) {
            self.surface.set_status(self.machine.status());
        }
    }

    pub fn handle_close(&mut self, attempt: u64) -> Option<Reconnect> {
        let reconnect = self.machine.on_close(attempt)?;
        warn!(attempt, "Telemetry channel disconnected");
        self.surface.set_status(self.machine.status());
        Some(reconnect)
    }

    /// Decode one text frame and apply it.
    pub fn handle_text(&mut self, text: &str) -> MessageOutcome {
        match InboundMessage::decode(text) {
            Ok(InboundMessage::Handshake { message }) => {
                info!(
                    greeting = message.as_deref().unwrap_or(""),
                    "Handshake received"
                );
                MessageOutcome::Handshake
            }
            Ok(InboundMessage::Update(update)) => {
                let changed = self.store.merge(&update);
                debug!(fields = update.len(), changed, "Applied metrics update");
                render(self.store.snapshot(), &mut self.surface);
                MessageOutcome::Applied { changed }
            }
            Err(e) => {
                warn!("Failed to parse telemetry message: {}", e);
                MessageOutcome::Discarded
            }
        }
    }
}
