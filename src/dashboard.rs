use thiserror::Error;

use crate::config::DashboardConfig;
use crate::data::model::{Metric, ObservationTable};
use crate::data::stats::BoxStats;
use crate::data::summary::{
    AggregateError, SummaryTable, mean_by_country, rank_by_mean, summarize_metrics,
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Outcome of loading one upload slot.
#[derive(Debug, Clone, Copy)]
pub enum Upload<'a> {
    Loaded(&'a ObservationTable),
    Failed { country: &'a str, message: &'a str },
}

// ---------------------------------------------------------------------------
// Halt states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Reasons the dashboard stops rendering after the side panel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardHalt {
    #[error("Upload at least one CSV to begin.")]
    NoUploads,
    #[error("Your files must include at least one of: GHI, DNI, DHI.")]
    NoMetrics,
    #[error("Could not load the {country} file: {message}")]
    LoadFailed { country: String, message: String },
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl DashboardHalt {
    pub fn severity(&self) -> Severity {
        match self {
            DashboardHalt::NoUploads => Severity::Info,
            _ => Severity::Error,
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Headline mean for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub country: String,
    pub metric: Metric,
    pub mean: Option<f64>,
}

/// Box plot data for the selected metric, one entry per country.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub metric: Metric,
    pub boxes: Vec<(String, Option<BoxStats>)>,
}

impl Distribution {
    pub fn build(table: &ObservationTable, metric: Metric) -> Self {
        let boxes = table
            .countries()
            .into_iter()
            .map(|country| {
                let stats = BoxStats::from_values(&table.numeric_values(metric.column(), &country));
                (country, stats)
            })
            .collect();
        Distribution { metric, boxes }
    }
}

/// Everything the central panel draws for one set of uploads.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub combined: ObservationTable,
    pub metric_options: Vec<Metric>,
    pub scorecards: Vec<Scorecard>,
    pub distribution: Distribution,
    pub summary: SummaryTable,
    /// Present only when the headline metric column exists.
    pub ranking: Option<Vec<(String, Option<f64>)>>,
    pub preview: ObservationTable,
    /// Country the preview is restricted to; all rows when `None`.
    pub preview_country: Option<String>,
    preview_rows: usize,
}

impl DashboardView {
    pub fn selected_metric(&self) -> Metric {
        self.distribution.metric
    }

    /// Switch the distribution view to `metric`. Only the box plot data is
    /// recomputed. Metrics not present in the data are ignored.
    pub fn select_metric(&mut self, metric: Metric) -> bool {
        if metric == self.distribution.metric || !self.metric_options.contains(&metric) {
            return false;
        }
        log::debug!("Recomputing distribution for {metric}");
        self.distribution = Distribution::build(&self.combined, metric);
        true
    }

    /// Restrict the raw preview to one country, or lift the restriction.
    pub fn filter_preview(&mut self, country: Option<String>) -> bool {
        if country == self.preview_country {
            return false;
        }
        self.preview = match &country {
            Some(c) => self.combined.filter_country(c).head(self.preview_rows),
            None => self.combined.head(self.preview_rows),
        };
        self.preview_country = country;
        true
    }
}

/// Build the full view from the current uploads. Pure: the same inputs
/// always produce the same view.
pub fn build_dashboard(
    uploads: &[Upload<'_>],
    selected_metric: Option<Metric>,
    config: &DashboardConfig,
) -> Result<DashboardView, DashboardHalt> {
    let mut tables = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match *upload {
            Upload::Loaded(table) => tables.push(table.clone()),
            Upload::Failed { country, message } => {
                return Err(DashboardHalt::LoadFailed {
                    country: country.to_string(),
                    message: message.to_string(),
                });
            }
        }
    }
    if tables.is_empty() {
        return Err(DashboardHalt::NoUploads);
    }

    let combined = ObservationTable::concat(&tables);
    let metric_options = combined.metric_options();
    let Some(&first_metric) = metric_options.first() else {
        return Err(DashboardHalt::NoMetrics);
    };

    let headline = config.headline_metric;
    let scorecards: Vec<Scorecard> = if combined.has_column(headline.column()) {
        mean_by_country(&combined, headline)?
            .into_iter()
            .map(|(country, mean)| Scorecard {
                country,
                metric: headline,
                mean,
            })
            .collect()
    } else {
        combined
            .countries()
            .into_iter()
            .map(|country| Scorecard {
                country,
                metric: headline,
                mean: None,
            })
            .collect()
    };

    let metric = selected_metric
        .filter(|m| metric_options.contains(m))
        .unwrap_or(first_metric);
    let distribution = Distribution::build(&combined, metric);

    let summary = summarize_metrics(&combined, &metric_options)?;

    let ranking = if combined.has_column(headline.column()) {
        Some(rank_by_mean(&combined, headline)?)
    } else {
        None
    };

    let preview = combined.head(config.preview_rows);

    log::debug!(
        "Built dashboard: {} rows, {} countries, metrics {:?}",
        combined.len(),
        scorecards.len(),
        metric_options
    );

    Ok(DashboardView {
        combined,
        metric_options,
        scorecards,
        distribution,
        summary,
        ranking,
        preview,
        preview_country: None,
        preview_rows: config.preview_rows,
    })
}

/// Format a number with thousands separators and two decimals, `NaN` when
/// missing.
pub fn format_thousands(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "NaN".to_string();
    };
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
