use std::path::{Path, PathBuf};

use crate::color::CountryColors;
use crate::config::{DashboardConfig, SlotConfig};
use crate::dashboard::{DashboardHalt, DashboardView, Upload, build_dashboard};
use crate::data::loader::load_csv_path;
use crate::data::model::{Metric, ObservationTable};

// ---------------------------------------------------------------------------
// Upload slots
// ---------------------------------------------------------------------------

/// What a slot currently holds.
#[derive(Debug, Clone)]
pub enum SlotData {
    Empty,
    Loaded {
        path: PathBuf,
        table: ObservationTable,
    },
    Failed {
        path: PathBuf,
        message: String,
    },
}

/// A side-panel file picker bound to one country label.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub title: String,
    pub country: String,
    pub data: SlotData,
}

impl UploadSlot {
    fn from_config(cfg: &SlotConfig) -> Self {
        UploadSlot {
            title: cfg.title.clone(),
            country: cfg.country.clone(),
            data: SlotData::Empty,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.data {
            SlotData::Empty => None,
            SlotData::Loaded { path, .. } | SlotData::Failed { path, .. } => Some(path),
        }
    }

    fn upload(&self) -> Option<Upload<'_>> {
        match &self.data {
            SlotData::Empty => None,
            SlotData::Loaded { table, .. } => Some(Upload::Loaded(table)),
            SlotData::Failed { message, .. } => Some(Upload::Failed {
                country: &self.country,
                message,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The view is rebuilt only
/// when an event changes its inputs.
pub struct AppState {
    pub config: DashboardConfig,

    pub slots: Vec<UploadSlot>,

    /// One colour per slot country, shared by all charts.
    pub colors: CountryColors,

    /// Current report, or the reason rendering stops.
    pub view: Result<DashboardView, DashboardHalt>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let slots: Vec<UploadSlot> = config.slots.iter().map(UploadSlot::from_config).collect();
        let countries: Vec<&str> = slots.iter().map(|s| s.country.as_str()).collect();
        let colors = CountryColors::new(&countries);
        let mut state = Self {
            config,
            slots,
            colors,
            view: Err(DashboardHalt::NoUploads),
            status_message: None,
        };
        state.rebuild();
        state
    }

    /// Load `path` into slot `idx` and rebuild the report.
    pub fn load_slot(&mut self, idx: usize, path: PathBuf) {
        let Some(slot) = self.slots.get_mut(idx) else {
            return;
        };
        slot.data = match load_csv_path(&path, &slot.country) {
            Ok(table) => SlotData::Loaded { path, table },
            Err(e) => {
                log::error!("Failed to load {} for {}: {e}", path.display(), slot.country);
                SlotData::Failed {
                    path,
                    message: e.to_string(),
                }
            }
        };
        self.rebuild();
    }

    /// Empty slot `idx` and rebuild the report.
    pub fn clear_slot(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            slot.data = SlotData::Empty;
            self.rebuild();
        }
    }

    /// Switch the distribution metric without touching the rest of the report.
    pub fn select_metric(&mut self, metric: Metric) {
        if let Ok(view) = &mut self.view {
            view.select_metric(metric);
        }
    }

    /// Restrict the raw preview to `country`, or show every country.
    pub fn filter_preview(&mut self, country: Option<String>) {
        if let Ok(view) = &mut self.view {
            view.filter_preview(country);
        }
    }

    pub fn selected_metric(&self) -> Option<Metric> {
        self.view.as_ref().ok().map(DashboardView::selected_metric)
    }

    /// Recompute the whole report from the slots.
    pub fn rebuild(&mut self) {
        let selected = self.selected_metric();
        let uploads: Vec<Upload<'_>> = self.slots.iter().filter_map(UploadSlot::upload).collect();
        self.view = build_dashboard(&uploads, selected, &self.config);
        if let Err(halt) = &self.view {
            log::warn!("Dashboard halted: {halt}");
        }
    }

    /// Write the current summary table to `path`.
    pub fn export_summary(&mut self, path: &Path) {
        let Ok(view) = &self.view else {
            return;
        };
        match crate::export::save_summary(path, &view.summary) {
            Ok(()) => {
                self.status_message = Some(format!("Summary saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export summary: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
