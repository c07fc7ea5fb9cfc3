mod channel;
mod error;
mod monitor;
mod state;
mod surface;
mod transport;

pub use channel::{ChannelManager, MessageOutcome};
pub use error::{ChannelError, Result};
pub use monitor::TelemetryMonitor;
pub use state::{ChannelStateMachine, Reconnect};
pub use surface::{ChannelSurface, DisplayUpdate};
pub use transport::{Connector, EventStream, TransportEvent, WsConnector};

// Re-export core types so front-ends only import from services
pub use holodash_core::{
    render, ConnectionState, ConnectionStatus, DashboardConfig, DisplayField, DisplaySurface,
    HoloDashError, MetricsSnapshot, RenderedFields,
};
