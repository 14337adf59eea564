use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

/// Name of the column that carries the country label on every row.
pub const COUNTRY_COLUMN: &str = "Country";

// ---------------------------------------------------------------------------
// CellValue – a single cell of an uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV column can infer to.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Non-numeric cells count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the fixed irradiance vocabulary
// ---------------------------------------------------------------------------

/// Solar irradiance measurements the dashboard knows how to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    /// Global Horizontal Irradiance.
    #[serde(rename = "GHI")]
    Ghi,
    /// Direct Normal Irradiance.
    #[serde(rename = "DNI")]
    Dni,
    /// Diffuse Horizontal Irradiance.
    #[serde(rename = "DHI")]
    Dhi,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Ghi, Metric::Dni, Metric::Dhi];

    /// Column header used in CSV files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Ghi => "GHI",
            Metric::Dni => "DNI",
            Metric::Dhi => "DHI",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Metric::Ghi => "Global Horizontal Irradiance",
            Metric::Dni => "Direct Normal Irradiance",
            Metric::Dhi => "Diffuse Horizontal Irradiance",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// ObservationTable – rows of one or more uploads
// ---------------------------------------------------------------------------

/// An ordered table of cells. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ObservationTable {
    /// Build a table from headers and rows. Short rows are padded with nulls,
    /// long rows are truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        ObservationTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Set `name` to `value` on every row, appending the column if absent.
    pub fn set_column(&mut self, name: &str, value: CellValue) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Distinct country labels in order of first appearance.
    pub fn countries(&self) -> Vec<String> {
        let Some(idx) = self.column_index(COUNTRY_COLUMN) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|row| row[idx].as_str())
            .filter(|c| seen.insert(c.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Metrics from the fixed vocabulary present as columns, in vocabulary order.
    pub fn metric_options(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| self.has_column(m.column()))
            .collect()
    }

    /// Numeric values of `column` for rows labelled `country`, in row order.
    pub fn numeric_values(&self, column: &str, country: &str) -> Vec<f64> {
        let (Some(col), Some(ctry)) = (self.column_index(column), self.column_index(COUNTRY_COLUMN))
        else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|row| row[ctry].as_str() == Some(country))
            .filter_map(|row| row[col].as_f64())
            .collect()
    }

    /// Rows whose country label equals `country` exactly.
    pub fn filter_country(&self, country: &str) -> ObservationTable {
        let Some(idx) = self.column_index(COUNTRY_COLUMN) else {
            return ObservationTable::new(self.columns.clone(), Vec::new());
        };
        let rows = self
            .rows
            .iter()
            .filter(|row| row[idx].as_str() == Some(country))
            .cloned()
            .collect();
        ObservationTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> ObservationTable {
        ObservationTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Stack tables vertically. Columns are the union in order of first
    /// appearance; cells missing from an input become null.
    pub fn concat(tables: &[ObservationTable]) -> ObservationTable {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for table in tables {
            for col in &table.columns {
                if !index.contains_key(col) {
                    index.insert(col.clone(), columns.len());
                    columns.push(col.clone());
                }
            }
        }

        let total: usize = tables.iter().map(|t| t.len()).sum();
        let mut rows = Vec::with_capacity(total);
        for table in tables {
            let targets: Vec<usize> = table.columns.iter().map(|c| index[c]).collect();
            for row in &table.rows {
                let mut out = vec![CellValue::Null; columns.len()];
                for (cell, &target) in row.iter().zip(&targets) {
                    out[target] = cell.clone();
                }
                rows.push(out);
            }
        }

        ObservationTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(country: &str, ghi: &[f64]) -> ObservationTable {
        let rows = ghi
            .iter()
            .map(|&v| vec![CellValue::Float(v), CellValue::String(country.into())])
            .collect();
        ObservationTable::new(vec!["GHI".into(), COUNTRY_COLUMN.into()], rows)
    }

    #[test]
    fn concat_sums_rows_and_unions_columns() {
        let a = table("Benin", &[1.0, 2.0]);
        let b = ObservationTable::new(
            vec!["DNI".into(), COUNTRY_COLUMN.into()],
            vec![vec![CellValue::Integer(7), CellValue::String("Togo".into())]],
        );
        let combined = ObservationTable::concat(&[a.clone(), b]);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.columns(), &["GHI", "Country", "DNI"]);
        assert_eq!(combined.rows()[0][2], CellValue::Null);
        assert_eq!(combined.rows()[2][0], CellValue::Null);
        assert_eq!(combined.rows()[2][2], CellValue::Integer(7));
    }

    #[test]
    fn filter_country_reproduces_input_rows() {
        let a = table("Benin", &[1.0, 2.0, 3.0]);
        let b = table("Togo", &[4.0]);
        let combined = ObservationTable::concat(&[a.clone(), b.clone()]);

        assert_eq!(combined.filter_country("Benin"), a);
        assert_eq!(combined.filter_country("Togo"), b);
        assert!(combined.filter_country("benin").is_empty());
    }

    #[test]
    fn countries_keep_first_appearance_order() {
        let combined = ObservationTable::concat(&[
            table("Togo", &[1.0]),
            table("Benin", &[2.0]),
            table("Togo", &[3.0]),
        ]);
        assert_eq!(combined.countries(), vec!["Togo", "Benin"]);
    }

    #[test]
    fn metric_options_follow_vocabulary_order() {
        let t = ObservationTable::new(
            vec!["DHI".into(), "Tamb".into(), "DNI".into()],
            Vec::new(),
        );
        assert_eq!(t.metric_options(), vec![Metric::Dni, Metric::Dhi]);
    }

    #[test]
    fn set_column_overwrites_in_place_or_appends() {
        let mut t = ObservationTable::new(
            vec!["Country".into(), "GHI".into()],
            vec![vec![CellValue::String("old".into()), CellValue::Integer(1)]],
        );
        t.set_column(COUNTRY_COLUMN, CellValue::String("Benin".into()));
        assert_eq!(t.columns(), &["Country", "GHI"]);
        assert_eq!(t.countries(), vec!["Benin"]);

        t.set_column("Site", CellValue::Bool(true));
        assert_eq!(t.columns(), &["Country", "GHI", "Site"]);
        assert_eq!(t.rows()[0][2], CellValue::Bool(true));
    }

    #[test]
    fn numeric_values_skip_missing_cells() {
        let t = ObservationTable::new(
            vec!["GHI".into(), COUNTRY_COLUMN.into()],
            vec![
                vec![CellValue::Integer(5), CellValue::String("Benin".into())],
                vec![CellValue::String("n/a".into()), CellValue::String("Benin".into())],
                vec![CellValue::Null, CellValue::String("Benin".into())],
                vec![CellValue::Float(f64::NAN), CellValue::String("Benin".into())],
                vec![CellValue::Float(2.5), CellValue::String("Togo".into())],
            ],
        );
        assert_eq!(t.numeric_values("GHI", "Benin"), vec![5.0]);
        assert_eq!(t.numeric_values("GHI", "Togo"), vec![2.5]);
    }
}
