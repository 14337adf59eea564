use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::model::{COUNTRY_COLUMN, Metric, ObservationTable};
use super::stats;

/// Decimal places every summary statistic is rounded to.
pub const SUMMARY_DECIMALS: i32 = 2;

/// The table does not match what the caller asked to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("metric column '{0}' is not present in the data")]
    MissingColumn(Metric),
    #[error("data has no 'Country' column to group by")]
    MissingCountryColumn,
}

// ---------------------------------------------------------------------------
// Summary records
// ---------------------------------------------------------------------------

/// Mean / median / sample std of one metric for one country, rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let round = |v: f64| stats::round_half_even(v, SUMMARY_DECIMALS);
        MetricSummary {
            mean: stats::mean(values).map(round),
            median: stats::median(values).map(round),
            std: stats::sample_std(values).map(round),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub metrics: BTreeMap<Metric, MetricSummary>,
}

/// One row per country, one [`MetricSummary`] per requested metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub metrics: Vec<Metric>,
    pub rows: Vec<CountrySummary>,
}

impl SummaryTable {
    pub fn get(&self, country: &str, metric: Metric) -> Option<&MetricSummary> {
        self.rows
            .iter()
            .find(|r| r.country == country)
            .and_then(|r| r.metrics.get(&metric))
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.country.as_str())
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Group rows by exact country label and summarise each requested metric.
/// Rows come out sorted by label. Non-numeric cells are skipped.
pub fn summarize_metrics(
    table: &ObservationTable,
    metrics: &[Metric],
) -> Result<SummaryTable, AggregateError> {
    let country_idx = table
        .column_index(COUNTRY_COLUMN)
        .ok_or(AggregateError::MissingCountryColumn)?;
    let metric_idx = metrics
        .iter()
        .map(|&m| {
            table
                .column_index(m.column())
                .ok_or(AggregateError::MissingColumn(m))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<&str, Vec<Vec<f64>>> = BTreeMap::new();
    for row in table.rows() {
        let Some(country) = row[country_idx].as_str() else {
            continue;
        };
        let values = groups
            .entry(country)
            .or_insert_with(|| vec![Vec::new(); metrics.len()]);
        for (slot, &idx) in values.iter_mut().zip(&metric_idx) {
            if let Some(v) = row[idx].as_f64() {
                slot.push(v);
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(country, values)| CountrySummary {
            country: country.to_string(),
            metrics: metrics
                .iter()
                .zip(&values)
                .map(|(&m, v)| (m, MetricSummary::from_values(v)))
                .collect(),
        })
        .collect();

    log::debug!(
        "Summarised {} rows over {:?}",
        table.len(),
        metrics
    );

    Ok(SummaryTable {
        metrics: metrics.to_vec(),
        rows,
    })
}

/// Unrounded mean of `metric` per country, countries in order of first
/// appearance. `None` when a country has no numeric value for the metric.
pub fn mean_by_country(
    table: &ObservationTable,
    metric: Metric,
) -> Result<Vec<(String, Option<f64>)>, AggregateError> {
    if !table.has_column(COUNTRY_COLUMN) {
        return Err(AggregateError::MissingCountryColumn);
    }
    if !table.has_column(metric.column()) {
        return Err(AggregateError::MissingColumn(metric));
    }
    Ok(table
        .countries()
        .into_iter()
        .map(|country| {
            let mean = stats::mean(&table.numeric_values(metric.column(), &country));
            (country, mean)
        })
        .collect())
}

/// Countries ranked by mean `metric`, highest first. Countries without a
/// value rank last.
pub fn rank_by_mean(
    table: &ObservationTable,
    metric: Metric,
) -> Result<Vec<(String, Option<f64>)>, AggregateError> {
    let mut ranking = mean_by_country(table, metric)?;
    ranking.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(ranking)
}
