use std::sync::mpsc::Sender;

use holodash_core::{ConnectionStatus, DisplayField, DisplaySurface, RenderedFields};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One change to the display, sent across threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// A complete render pass
    Fields(RenderedFields),
    Status(ConnectionStatus),
    Host(Option<String>),
}

/// Display surface that forwards to a receiver on another thread.
///
/// Field writes are buffered and sent as one [`DisplayUpdate::Fields`] on
/// commit. When the receiver is gone the surface cancels `shutdown`.
pub struct ChannelSurface {
    tx: Sender<DisplayUpdate>,
    pending: RenderedFields,
    host: Option<String>,
    shutdown: CancellationToken,
}

impl ChannelSurface {
    pub fn new(tx: Sender<DisplayUpdate>, shutdown: CancellationToken) -> Self {
        Self {
            tx,
            pending: RenderedFields::default(),
            host: None,
            shutdown,
        }
    }

    fn send(&mut self, update: DisplayUpdate) {
        if self.tx.send(update).is_err() && !self.shutdown.is_cancelled() {
            debug!("Display receiver dropped, stopping channel");
            self.shutdown.cancel();
        }
    }
}

impl DisplaySurface for ChannelSurface {
    fn set_text(&mut self, field: DisplayField, text: &str) {
        self.pending.set(field, text);
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.send(DisplayUpdate::Status(status));
    }

    fn set_host(&mut self, host: Option<&str>) {
        let host = host.map(str::to_string);
        if host != self.host {
            self.host = host.clone();
            self.send(DisplayUpdate::Host(host));
        }
    }

    fn commit(&mut self) {
        let fields = self.pending.clone();
        self.send(DisplayUpdate::Fields(fields));
    }
}
