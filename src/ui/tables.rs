use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, ObservationTable};
use crate::data::summary::SummaryTable;

const ROW_HEIGHT: f32 = 18.0;

fn stat_text(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "NaN".to_string())
}

/// Countries down, `metric × (mean, median, std)` across.
pub fn summary_table(ui: &mut Ui, summary: &SummaryTable) {
    let n_stats = summary.metrics.len() * 3;

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::right_to_left(egui::Align::Center))
            .column(Column::auto().at_least(110.0))
            .columns(Column::auto().at_least(70.0), n_stats)
            .header(ROW_HEIGHT * 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Country");
                });
                for metric in &summary.metrics {
                    for stat in ["mean", "median", "std"] {
                        header.col(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(metric.column());
                                ui.label(stat);
                            });
                        });
                    }
                }
            })
            .body(|mut body| {
                for row in &summary.rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(&row.country);
                        });
                        for metric in &summary.metrics {
                            let s = row.metrics.get(metric).copied().unwrap_or_default();
                            for value in [s.mean, s.median, s.std] {
                                table_row.col(|ui| {
                                    ui.monospace(stat_text(value));
                                });
                            }
                        }
                    });
                }
            });
    });
}

/// Raw rows in file order.
pub fn preview_table(ui: &mut Ui, table: &ObservationTable) {
    let columns = table.columns();

    ui.push_id("preview_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(400.0)
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(ROW_HEIGHT, |mut header| {
                    for name in columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut table_row| {
                        let row = &table.rows()[table_row.index()];
                        for cell in row {
                            table_row.col(|ui| {
                                ui.label(cell_text(cell));
                            });
                        }
                    });
                });
        });
    });
}

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}
