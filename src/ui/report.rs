use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::dashboard::{DashboardHalt, DashboardView, Severity, format_thousands};
use crate::data::model::Metric;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Central panel – the report
// ---------------------------------------------------------------------------

/// Render the report, or the banner explaining why there is none.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            intro(ui, &state.config);
            ui.separator();

            let mut events = ReportEvents::default();
            match &state.view {
                Err(halt) => banner(ui, halt),
                Ok(view) => events = report(ui, view, state),
            }
            if let Some(metric) = events.metric {
                state.select_metric(metric);
            }
            if let Some(country) = events.preview_country {
                state.filter_preview(country);
            }
        });
}

fn intro(ui: &mut Ui, config: &DashboardConfig) {
    let countries: Vec<&str> = config.slots.iter().map(|s| s.country.as_str()).collect();
    ui.heading("Cross-Country Solar Comparison");
    ui.label(RichText::new(countries.join(" • ")).weak());
    ui.add_space(4.0);
    ui.label(
        "Upload cleaned CSVs in the left panel to compare GHI / DNI / DHI across countries. \
         The report shows distributions, summary statistics and a ranking by average GHI. \
         Expand \"Show combined data\" at the bottom to preview the merged rows.",
    );
}

fn banner(ui: &mut Ui, halt: &DashboardHalt) {
    let (icon, color) = match halt.severity() {
        Severity::Info => ("ℹ", Color32::from_rgb(70, 130, 200)),
        Severity::Error => ("⚠", Color32::from_rgb(210, 60, 60)),
    };
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(icon).color(color).strong());
            ui.label(RichText::new(halt.to_string()).color(color));
        });
    });
}

/// Selector changes made while drawing the report.
#[derive(Default)]
struct ReportEvents {
    metric: Option<Metric>,
    preview_country: Option<Option<String>>,
}

fn report(ui: &mut Ui, view: &DashboardView, state: &AppState) -> ReportEvents {
    let mut events = ReportEvents::default();

    // ---- Scorecards ----
    ui.add_space(8.0);
    ui.heading("Key Metrics Overview");
    ui.label(format!(
        "Average {} gives an overall sense of each country's solar energy potential.",
        state.config.headline_metric.column()
    ));
    if !view.scorecards.is_empty() {
        ui.columns(view.scorecards.len(), |cols: &mut [Ui]| {
            for (col, card) in cols.iter_mut().zip(&view.scorecards) {
                egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                    ui.label(format!("{} • Mean {}", card.country, card.metric));
                    ui.label(
                        RichText::new(format_thousands(card.mean))
                            .size(24.0)
                            .color(state.colors.color_for(&card.country)),
                    );
                });
            }
        });
    }

    // ---- Distribution ----
    ui.add_space(12.0);
    ui.heading("Distribution Comparison");
    ui.label(
        "Each box shows how the selected metric varies within a country. A higher median and \
         upper whisker indicate stronger sunlight; dots beyond the whiskers are extreme peaks.",
    );
    let current = view.selected_metric();
    let mut selected = current;
    egui::ComboBox::from_id_salt("metric_select")
        .selected_text(selected.column())
        .show_ui(ui, |ui: &mut Ui| {
            for &m in &view.metric_options {
                let label = format!("{} ({})", m.column(), m.description());
                ui.selectable_value(&mut selected, m, label);
            }
        });
    if selected != current {
        events.metric = Some(selected);
    }
    plot::distribution_plot(ui, &view.distribution, &state.colors);

    // ---- Summary ----
    ui.add_space(12.0);
    ui.heading("Summary Table (mean / median / std)");
    ui.label(
        "Higher mean and median values indicate better solar conditions, \
         while std shows consistency or fluctuation.",
    );
    tables::summary_table(ui, &view.summary);

    // ---- Ranking ----
    if let Some(ranking) = &view.ranking {
        let metric = state.config.headline_metric;
        ui.add_space(12.0);
        ui.heading(format!("Average {metric} by Country"));
        ui.label(format!("Countries ranked by their average {metric}."));
        plot::ranking_chart(ui, metric, ranking, &state.colors);
    }

    // ---- Raw preview ----
    ui.add_space(12.0);
    egui::CollapsingHeader::new(format!(
        "Show combined data (first {} rows)",
        state.config.preview_rows
    ))
    .default_open(false)
    .show(ui, |ui: &mut Ui| {
        ui.label("Preview of the merged dataset used for analysis.");

        let mut country = view.preview_country.clone();
        egui::ComboBox::from_id_salt("preview_country")
            .selected_text(country.as_deref().unwrap_or("All countries"))
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut country, None, "All countries");
                for card in &view.scorecards {
                    ui.selectable_value(&mut country, Some(card.country.clone()), &card.country);
                }
            });
        if country != view.preview_country {
            events.preview_country = Some(country);
        }

        tables::preview_table(ui, &view.preview);
    });

    events
}
