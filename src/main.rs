mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod export;
mod state;
mod ui;

use app::SolarCompareApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    log::info!(
        "Starting with {} upload slots, preview capped at {} rows",
        config.slots.len(),
        config.preview_rows
    );

    eframe::run_native(
        "Solar Compare – Cross-Country Irradiance",
        options,
        Box::new(|_cc| Ok(Box::new(SolarCompareApp::new(config)))),
    )
}
