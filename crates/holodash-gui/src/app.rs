use eframe::egui;
use holodash_services::DashboardConfig;

use crate::panels::dashboard::DashboardPanel;

pub struct HoloDashApp {
    dashboard: DashboardPanel,
}

impl HoloDashApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            dashboard: DashboardPanel::new(config),
        }
    }
}

impl eframe::App for HoloDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.ui(ui);
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
