use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::data::summary::SummaryTable;

/// Write the summary table to `path`. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – one row per country, `<metric> mean|median|std` columns
/// * `.json` – `[{ "country": ..., "metrics": { "GHI": { "mean": ... } } }, ...]`
pub fn save_summary(path: &Path, summary: &SummaryTable) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let write: fn(BufWriter<File>, &SummaryTable) -> Result<()> = match ext.as_str() {
        "csv" => write_summary_csv,
        "json" => write_summary_json,
        other => bail!("Unsupported export extension: .{other}"),
    };

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(BufWriter::new(file), summary)
        .with_context(|| format!("writing summary to {}", path.display()))?;

    log::info!(
        "Exported summary for {} countries to {}",
        summary.rows.len(),
        path.display()
    );
    Ok(())
}

/// Flattened CSV: `Country, GHI mean, GHI median, GHI std, ...`. Missing
/// statistics are written as empty fields.
pub fn write_summary_csv<W: Write>(writer: W, summary: &SummaryTable) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["Country".to_string()];
    for metric in &summary.metrics {
        for stat in ["mean", "median", "std"] {
            header.push(format!("{metric} {stat}"));
        }
    }
    out.write_record(&header)?;

    for row in &summary.rows {
        let mut record = vec![row.country.clone()];
        for metric in &summary.metrics {
            let s = row.metrics.get(metric).copied().unwrap_or_default();
            for value in [s.mean, s.median, s.std] {
                record.push(value.map(|v| format!("{v:.2}")).unwrap_or_default());
            }
        }
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

pub fn write_summary_json<W: Write>(writer: W, summary: &SummaryTable) -> Result<()> {
    serde_json::to_writer_pretty(writer, &summary.rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv;
    use crate::data::model::{Metric, ObservationTable};
    use crate::data::summary::summarize_metrics;

    fn summary() -> SummaryTable {
        let a = load_csv("GHI,DNI\n100,1\n200,2\n".as_bytes(), "Benin").unwrap();
        let b = load_csv("GHI,DNI\n300,\n".as_bytes(), "Togo").unwrap();
        summarize_metrics(&ObservationTable::concat(&[a, b]), &[Metric::Ghi, Metric::Dni]).unwrap()
    }

    #[test]
    fn csv_export_is_flattened() {
        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Country,GHI mean,GHI median,GHI std,DNI mean,DNI median,DNI std\n\
             Benin,150.00,150.00,70.71,1.50,1.50,0.71\n\
             Togo,300.00,300.00,,,,\n"
        );
    }

    #[test]
    fn json_export_has_nulls_for_missing() {
        let mut buf = Vec::new();
        write_summary_json(&mut buf, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value[0]["country"], "Benin");
        assert_eq!(value[0]["metrics"]["GHI"]["std"], 70.71);
        assert!(value[1]["metrics"]["GHI"]["std"].is_null());
        assert!(value[1]["metrics"]["DNI"]["mean"].is_null());
    }

    #[test]
    fn save_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("summary.CSV");
        save_summary(&csv_path, &summary()).unwrap();
        assert!(std::fs::read_to_string(&csv_path).unwrap().starts_with("Country,"));

        let xlsx = dir.path().join("summary.xlsx");
        let err = save_summary(&xlsx, &summary()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
        assert!(!xlsx.exists());
    }
}
