use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{COUNTRY_COLUMN, CellValue, ObservationTable};

/// Tokens read as missing values, in addition to the empty string.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("no columns to parse from file")]
    Empty,
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse comma-separated text with a header row and tag every row with
/// `country`. An existing `Country` column is overwritten in place.
///
/// Repeated header names get a `.1`, `.2`, ... suffix so every column stays
/// addressable by name.
pub fn load_csv<R: Read>(reader: R, country: &str) -> Result<ObservationTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let headers = dedupe_headers(headers.iter());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    let mut table = ObservationTable::new(headers, rows);
    table.set_column(COUNTRY_COLUMN, CellValue::String(country.to_string()));
    Ok(table)
}

/// Open `path` and load it with [`load_csv`].
pub fn load_csv_path(path: &Path, country: &str) -> Result<ObservationTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_csv(std::io::BufReader::new(file), country)?;
    log::info!(
        "Loaded {} rows for {country} from {} with columns {:?}",
        table.len(),
        path.display(),
        table.columns()
    );
    Ok(table)
}

fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let mut name = name.to_string();
        let mut count = seen.get(&name).copied().unwrap_or(0);
        while count > 0 {
            seen.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = seen.get(&name).copied().unwrap_or(0);
        }
        seen.insert(name.clone(), 1);
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// Cell type inference
// ---------------------------------------------------------------------------

fn guess_cell_type(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        return CellValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    match trimmed {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Metric;
    use crate::data::summary::summarize_metrics;
    use std::io::Write;

    #[test]
    fn every_row_gets_the_label() {
        let csv = "Timestamp,GHI,DNI\n2021-08-09 00:01,1.2,0.0\n2021-08-09 00:02,3,-0.5\n";
        let table = load_csv(csv.as_bytes(), "Benin").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["Timestamp", "GHI", "DNI", "Country"]);
        assert_eq!(table.countries(), vec!["Benin"]);
        assert_eq!(table.filter_country("Benin").len(), table.len());
        assert_eq!(table.rows()[1][1], CellValue::Integer(3));
        assert_eq!(table.rows()[1][2], CellValue::Float(-0.5));
    }

    #[test]
    fn existing_country_column_is_overwritten() {
        let csv = "Country,GHI\nNowhere,1\nElsewhere,2\n";
        let table = load_csv(csv.as_bytes(), "Togo").unwrap();

        assert_eq!(table.columns(), &["Country", "GHI"]);
        assert_eq!(table.countries(), vec!["Togo"]);
    }

    #[test]
    fn header_only_file_yields_empty_table() {
        let table = load_csv("GHI,DHI\n".as_bytes(), "Sierra Leone").unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("Country"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = load_csv("".as_bytes(), "Benin").unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn duplicate_country_header_keeps_the_label() {
        let csv = "Country,GHI,Country\nX,1,Y\n";
        let table = load_csv(csv.as_bytes(), "Benin").unwrap();
        assert_eq!(table.columns(), &["Country", "GHI", "Country.1"]);

        let combined = ObservationTable::concat(&[table]);
        assert_eq!(combined.countries(), vec!["Benin"]);
        assert_eq!(combined.rows()[0][2], CellValue::String("Y".into()));
    }

    #[test]
    fn duplicate_metric_header_is_renamed() {
        let csv = "GHI,GHI\n1,100\n3,300\n";
        let table = load_csv(csv.as_bytes(), "Benin").unwrap();
        assert_eq!(table.columns(), &["GHI", "GHI.1", "Country"]);

        let direct = summarize_metrics(&table, &[Metric::Ghi]).unwrap();
        let combined = ObservationTable::concat(&[table]);
        let combined = summarize_metrics(&combined, &[Metric::Ghi]).unwrap();
        assert_eq!(direct, combined);

        let ghi = direct.get("Benin", Metric::Ghi).unwrap();
        assert_eq!(ghi.mean, Some(2.0));
        assert_eq!(ghi.std, Some(1.41));
    }

    #[test]
    fn renamed_header_does_not_clash_with_existing_suffix() {
        let names = dedupe_headers(["a", "a", "a.1", "a"].into_iter());
        assert_eq!(names, vec!["a", "a.1", "a.1.1", "a.2"]);
    }

    #[test]
    fn non_numeric_and_na_cells() {
        let csv = "GHI,Note\nNA,ok\n,\nbroken,true\n";
        let table = load_csv(csv.as_bytes(), "Benin").unwrap();

        assert_eq!(table.rows()[0][0], CellValue::Null);
        assert_eq!(table.rows()[1][0], CellValue::Null);
        assert_eq!(table.rows()[1][1], CellValue::Null);
        assert_eq!(table.rows()[2][0], CellValue::String("broken".into()));
        assert_eq!(table.rows()[2][1], CellValue::Bool(true));
        assert!(table.numeric_values("GHI", "Benin").is_empty());
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let csv = "GHI,DNI\n1,2\n3\n";
        let err = load_csv(csv.as_bytes(), "Benin").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bytes: &[u8] = b"GHI\n\xff\xfe\n";
        let err = load_csv(bytes, "Benin").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GHI,DHI").unwrap();
        writeln!(file, "10.5,2").unwrap();
        let table = load_csv_path(file.path(), "Togo").unwrap();

        assert_eq!(table.numeric_values("GHI", "Togo"), vec![10.5]);
        assert_eq!(table.numeric_values("DHI", "Togo"), vec![2.0]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv_path(&dir.path().join("absent.csv"), "Togo").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
