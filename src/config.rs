use crate::data::model::Metric;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// One upload slot in the side panel, bound to a country label.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotConfig {
    /// Text shown above the file picker.
    pub title: String,
    /// Label written into the `Country` column of every loaded row.
    pub country: String,
}

impl SlotConfig {
    fn new(title: &str, country: &str) -> Self {
        SlotConfig {
            title: title.to_string(),
            country: country.to_string(),
        }
    }
}

/// Compiled-in settings for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub slots: Vec<SlotConfig>,
    /// Metric used for the scorecards and the ranking chart.
    pub headline_metric: Metric,
    /// Rows shown in the combined-data preview.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            slots: vec![
                SlotConfig::new("Benin", "Benin"),
                SlotConfig::new("Sierraleone", "Sierra Leone"),
                SlotConfig::new("Togo", "Togo"),
            ],
            headline_metric: Metric::Ghi,
            preview_rows: 100,
            window_size: [1200.0, 900.0],
            min_window_size: [640.0, 480.0],
        }
    }
}
