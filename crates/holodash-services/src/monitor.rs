use std::sync::mpsc::{channel, Receiver};
use std::thread;

use holodash_core::DashboardConfig;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::channel::ChannelManager;
use crate::surface::{ChannelSurface, DisplayUpdate};

/// Runs a [`ChannelManager`] on a background thread for front-ends that
/// are not async themselves.
pub struct TelemetryMonitor {
    config: DashboardConfig,
}

impl TelemetryMonitor {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Subscribe to display updates.
    ///
    /// The channel keeps reconnecting until the returned token is cancelled
    /// or the receiver is dropped.
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    pub fn subscribe(&self) -> (Receiver<DisplayUpdate>, CancellationToken) {
        info!("Starting telemetry monitor subscription");
        let (tx, rx) = channel();
        let cancel = CancellationToken::new();
        let config = self.config.clone();
        let shutdown = cancel.clone();

        thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let surface = ChannelSurface::new(tx, shutdown.clone());
                let mut manager = ChannelManager::websocket(config, surface);
                manager.run(shutdown).await;
            });

            info!("Telemetry monitor stopped");
        });

        (rx, cancel)
    }
}
