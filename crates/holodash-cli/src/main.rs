mod terminal;

use anyhow::Result;
use clap::Parser;
use holodash_services::{ChannelManager, DashboardConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(name = "holodash")]
#[command(about = "HoloDash - live system telemetry in the terminal", long_about = None)]
struct Cli {
    /// Telemetry source WebSocket URL (overrides HOLODASH_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Delay between reconnect attempts in milliseconds (overrides HOLODASH_RECONNECT_MS)
    #[arg(short, long)]
    reconnect_ms: Option<u64>,
}

fn resolve_config(cli: &Cli, base: DashboardConfig) -> Result<DashboardConfig> {
    let mut config = base;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(reconnect_ms) = cli.reconnect_ms {
        config.reconnect_delay_ms = reconnect_ms;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("holodash_services=info,holodash=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli, DashboardConfig::from_env()?)?;
    info!(endpoint = %config.endpoint, delay_ms = config.reconnect_delay_ms, "HoloDash starting");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            ctrl_c.cancel();
        }
    });

    let surface = TerminalSurface::new(std::io::stdout());
    let mut manager = ChannelManager::websocket(config, surface);
    manager.run(cancel).await;

    Ok(())
}
