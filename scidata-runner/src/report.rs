//! Run report: what was requested, what each source delivered, and a
//! content hash of the CSV that was written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scidata_core::timeline::AlignPolicy;

use crate::pipeline::{PipelineOutput, SourceSummary};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// JSON summary of one successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Requested start date, `DD/MM/YYYY`.
    pub start_date: String,
    pub duration_days: u32,
    pub policy: AlignPolicy,
    pub output_file: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    /// BLAKE3 of the CSV body, hex.
    pub csv_blake3: String,
    /// Sources with at least one padded hour.
    pub padded_sources: Vec<String>,
    pub sources: Vec<SourceSummary>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl RunReport {
    pub fn new(output: &PipelineOutput, output_file: &str, csv_body: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            start_date: output.request.start.format("%d/%m/%Y").to_string(),
            duration_days: output.request.duration_days,
            policy: output.policy,
            output_file: output_file.to_string(),
            columns: output.columns.clone(),
            row_count: output.rows.len(),
            csv_blake3: content_hash(csv_body),
            padded_sources: output
                .sources
                .iter()
                .filter(|s| s.is_padded())
                .map(|s| s.source.clone())
                .collect(),
            sources: output.sources.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize RunReport to JSON")
    }

    /// Parse a report, rejecting schema versions newer than this build.
    pub fn from_json(json: &str) -> Result<Self> {
        let report: RunReport =
            serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
        if report.schema_version > SCHEMA_VERSION {
            anyhow::bail!(
                "unsupported schema version {} (max supported: {})",
                report.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(report)
    }
}

/// Hex BLAKE3 hash of a file body.
pub fn content_hash(body: &str) -> String {
    blake3::hash(body.as_bytes()).to_hex().to_string()
}
