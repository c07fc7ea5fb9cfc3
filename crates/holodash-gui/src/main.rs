mod app;
mod panels;

use anyhow::Result;
use app::HoloDashApp;
use eframe::egui;
use holodash_services::DashboardConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Set up file logging to /tmp/holodash.log
    let file_appender = tracing_appender::rolling::never("/tmp", "holodash.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("holodash_services=debug,holodash_gui=info")
        }))
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    let config = DashboardConfig::from_env()?;
    tracing::info!(endpoint = %config.endpoint, "HoloDash GUI starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 360.0])
            .with_min_inner_size([360.0, 240.0])
            .with_title("HoloDash"),
        ..Default::default()
    };

    eframe::run_native(
        "HoloDash",
        options,
        Box::new(move |cc| Ok(Box::new(HoloDashApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI exited with error: {}", e))
}
