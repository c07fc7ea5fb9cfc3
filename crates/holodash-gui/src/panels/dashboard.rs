use eframe::egui;
use holodash_services::{
    ConnectionStatus, DashboardConfig, DisplayField, DisplayUpdate, RenderedFields,
    TelemetryMonitor,
};
use std::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;

/// Last state received from the telemetry channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub fields: RenderedFields,
    pub status: ConnectionStatus,
    pub host: Option<String>,
}

impl DashboardView {
    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Fields(fields) => self.fields = fields,
            DisplayUpdate::Status(status) => self.status = status,
            DisplayUpdate::Host(host) => self.host = host,
        }
    }
}

pub struct DashboardPanel {
    endpoint: String,
    view: DashboardView,
    updates_rx: Receiver<DisplayUpdate>,
    cancel: CancellationToken,
}

impl DashboardPanel {
    pub fn new(config: DashboardConfig) -> Self {
        let endpoint = config.endpoint.clone();
        let monitor = TelemetryMonitor::new(config);
        let (updates_rx, cancel) = monitor.subscribe();

        Self {
            endpoint,
            view: DashboardView::default(),
            updates_rx,
            cancel,
        }
    }

    pub fn update(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            self.view.apply(update);
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.update();

        ui.horizontal(|ui| {
            ui.heading("HoloDash");
            ui.colored_label(status_color(self.view.status), "●");
            ui.label(self.view.status.text());
        });
        ui.label(egui::RichText::new(&self.endpoint).small().weak());

        if let Some(host) = &self.view.host {
            ui.label(host.as_str());
        }

        ui.separator();

        for field in DisplayField::ALL {
            ui.label(
                egui::RichText::new(self.view.fields.get(field))
                    .monospace()
                    .size(20.0),
            );
            ui.add_space(4.0);
        }
    }
}

impl Drop for DashboardPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn status_color(status: ConnectionStatus) -> egui::Color32 {
    match status {
        ConnectionStatus::Connected => egui::Color32::GREEN,
        ConnectionStatus::Error => egui::Color32::RED,
        ConnectionStatus::Disconnected => egui::Color32::YELLOW,
        ConnectionStatus::Connecting => egui::Color32::GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_applies_updates() {
        let mut view = DashboardView::default();
        assert_eq!(view.status, ConnectionStatus::Connecting);

        let mut fields = RenderedFields::default();
        fields.set(DisplayField::Cpu, "CPU: 42.4%");
        view.apply(DisplayUpdate::Fields(fields));
        view.apply(DisplayUpdate::Status(ConnectionStatus::Connected));
        view.apply(DisplayUpdate::Host(Some("studio · macOS".to_string())));

        assert_eq!(view.fields.cpu, "CPU: 42.4%");
        assert!(view.status.is_connected());
        assert_eq!(view.host.as_deref(), Some("studio · macOS"));
    }

    #[test]
    fn test_disconnect_keeps_last_fields() {
        let mut view = DashboardView::default();
        let mut fields = RenderedFields::default();
        fields.set(DisplayField::Power, "Power: 2.5 W");
        view.apply(DisplayUpdate::Fields(fields));
        view.apply(DisplayUpdate::Status(ConnectionStatus::Disconnected));

        assert_eq!(view.fields.power, "Power: 2.5 W");
    }
}
