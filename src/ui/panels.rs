use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, SlotData};

// ---------------------------------------------------------------------------
// Left side panel – upload slots
// ---------------------------------------------------------------------------

/// Render the left upload panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Cleaned CSVs");
    ui.label(
        RichText::new(
            "CSV must include columns: Country (or will be added), GHI (plus optional DNI, DHI).",
        )
        .italics()
        .small(),
    );
    ui.separator();

    // Events are collected first and applied after the loop so the slots
    // are not borrowed while state changes.
    let mut pick: Option<usize> = None;
    let mut clear: Option<usize> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, slot) in state.slots.iter().enumerate() {
                ui.strong(&slot.title);

                ui.horizontal(|ui: &mut Ui| {
                    if ui.button("Browse…").clicked() {
                        pick = Some(idx);
                    }
                    if slot.path().is_some()
                        && ui
                            .small_button("✖")
                            .on_hover_text("Remove file")
                            .clicked()
                    {
                        clear = Some(idx);
                    }
                });

                match &slot.data {
                    SlotData::Empty => {
                        ui.weak("No file");
                    }
                    SlotData::Loaded { path, table } => {
                        let name = file_name(path);
                        let swatch = state.colors.color_for(&slot.country);
                        ui.label(
                            RichText::new(format!("{name}  ({} rows)", table.len())).color(swatch),
                        );
                    }
                    SlotData::Failed { path, .. } => {
                        let name = file_name(path);
                        ui.label(RichText::new(format!("{name}  (failed)")).color(Color32::RED));
                    }
                }
                ui.add_space(8.0);
            }
        });

    if let Some(idx) = clear {
        state.clear_slot(idx);
    }
    if let Some(idx) = pick {
        open_file_dialog(state, idx);
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for idx in 0..state.slots.len() {
                let label = format!("Open {} CSV…", state.slots[idx].title);
                if ui.button(label).clicked() {
                    open_file_dialog(state, idx);
                    ui.close_menu();
                }
            }
            ui.separator();
            let can_export = state.view.is_ok();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Ok(view) = &state.view {
            ui.label(format!(
                "{} rows from {} countries",
                view.combined.len(),
                view.scorecards.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, idx: usize) {
    let Some(slot) = state.slots.get(idx) else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {} CSV", slot.title))
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_slot(idx, path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary table")
        .set_file_name("summary.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_summary(&path);
    }
}
