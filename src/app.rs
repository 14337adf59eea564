use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SolarCompareApp {
    pub state: AppState,
}

impl SolarCompareApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SolarCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: uploads ----
        egui::SidePanel::left("upload_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::central_panel(ui, &mut self.state);
        });
    }
}
