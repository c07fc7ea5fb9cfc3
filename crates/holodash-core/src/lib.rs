// Domain modules
pub mod config;
pub mod error;
pub mod message;
pub mod metrics;
pub mod render;
pub mod status;

pub use config::DashboardConfig;
pub use error::{HoloDashError, Result};
pub use message::InboundMessage;
pub use metrics::{MetricsSnapshot, MetricsStore, MetricsUpdate};
pub use render::{render, DisplayField, DisplaySurface, RenderedFields};
pub use status::{ConnectionState, ConnectionStatus};
