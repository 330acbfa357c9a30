//! CSV export of the merged table and the JSON run report.
//!
//! The CSV has one line per hour: `hour_index,<values...>`, comma-separated,
//! `\n`-terminated, no header unless asked for. Files are written atomically
//! (write to `.tmp`, rename into place) so a failed run never leaves a
//! partial table behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scidata_core::domain::MergedRow;

use crate::pipeline::PipelineOutput;
use crate::report::RunReport;

/// Render merged rows as CSV, optionally preceded by a header record.
pub fn render_csv(rows: &[MergedRow], header: Option<&[String]>) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    if let Some(header) = header {
        wtr.write_record(header)?;
    }
    for row in rows {
        wtr.write_record(row.fields())?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write `contents` to `dir/file_name` atomically. Returns the final path.
pub fn write_atomic(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir: {}", dir.display()))?;

    let path = dir.join(file_name);
    let tmp = dir.join(format!("{file_name}.tmp"));
    fs::write(&tmp, contents).with_context(|| format!("failed to write {}", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, &path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("failed to move {} into place", path.display()));
    }
    Ok(path)
}

/// Paths written by [`save_output`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedOutput {
    pub csv: PathBuf,
    pub report: Option<PathBuf>,
    pub csv_hash: String,
}

/// Save the merged table as `DD_MM_YYYY_+N.csv` under `output_dir`, and
/// optionally the run report next to it (`DD_MM_YYYY_+N.report.json`).
pub fn save_output(
    output: &PipelineOutput,
    output_dir: &Path,
    header: bool,
    report: bool,
) -> Result<SavedOutput> {
    let body = render_csv(&output.rows, header.then_some(output.columns.as_slice()))?;
    let file_name = output.request.output_file_name();
    let csv = write_atomic(output_dir, &file_name, &body)?;

    let run_report = RunReport::new(output, &file_name, &body);
    let report = if report {
        let json = run_report.to_json()?;
        Some(write_atomic(output_dir, &report_file_name(&file_name), &json)?)
    } else {
        None
    };

    Ok(SavedOutput {
        csv,
        report,
        csv_hash: run_report.csv_blake3,
    })
}

/// `DD_MM_YYYY_+N.csv` → `DD_MM_YYYY_+N.report.json`
pub fn report_file_name(csv_name: &str) -> String {
    let stem = csv_name.strip_suffix(".csv").unwrap_or(csv_name);
    format!("{stem}.report.json")
}
