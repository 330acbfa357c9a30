//! Pipeline runner: wires together fetching, alignment, and merge.
//!
//! Two entry points:
//! - `prepare()`: validates the raw CLI inputs and loads the source table.
//! - `run_pipeline()`: fetches every source's day list (sequentially),
//!   aligns the sources (in parallel, declaration order kept), and merges
//!   them into hour-indexed rows.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use scidata_core::config::{ConfigError, InputError, RunRequest, SourceTable};
use scidata_core::data::{fetch_source_days, BlockProvider, FetchProgress, SourceBlocks};
use scidata_core::domain::{MergedRow, SourceSpec};
use scidata_core::timeline::{
    merge_series, AlignPolicy, AlignedSeries, AlignmentFault, SourceAligner, SourceStats,
};

/// Errors from the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("alignment fault: {0}")]
    Alignment(#[from] AlignmentFault),
}

/// Knobs for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub policy: AlignPolicy,
    /// Align sources one after another instead of on the rayon pool.
    #[serde(default)]
    pub sequential: bool,
}

impl PipelineOptions {
    pub fn with_policy(mut self, policy: AlignPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.sequential = !parallel;
        self
    }
}

/// Per-source outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub rows: usize,
    pub expected_rows: usize,
    /// One message per day whose file could not be fetched.
    pub fetch_errors: Vec<String>,
    pub stats: SourceStats,
}

impl SourceSummary {
    fn new(series: &AlignedSeries, blocks: &SourceBlocks) -> Self {
        Self {
            source: series.source.clone(),
            rows: series.len(),
            expected_rows: series.expected_len,
            fetch_errors: blocks
                .errors
                .iter()
                .map(|(day, e)| format!("{day}: {e}"))
                .collect(),
            stats: series.stats.clone(),
        }
    }

    /// True when any hour of this source was nulled by the padding policy.
    pub fn is_padded(&self) -> bool {
        self.stats.padded > 0
    }
}

/// Merged table plus everything needed to write and report it.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub request: RunRequest,
    pub policy: AlignPolicy,
    /// `hour_index` followed by every source's value columns.
    pub columns: Vec<String>,
    pub rows: Vec<MergedRow>,
    pub sources: Vec<SourceSummary>,
}

/// Validate raw inputs and load the source table (built-in table when no
/// file is given).
pub fn prepare(
    start_date: &str,
    duration_days: i64,
    sources: Option<&Path>,
) -> Result<(RunRequest, SourceTable), PipelineError> {
    let request = RunRequest::parse(start_date, duration_days)?;
    let table = match sources {
        Some(path) => SourceTable::from_file(path)?,
        None => SourceTable::space_weather(),
    };
    Ok((request, table))
}

/// Fetch every source's day list, one source after another.
pub fn fetch_all(
    request: &RunRequest,
    table: &SourceTable,
    provider: &dyn BlockProvider,
    progress: &dyn FetchProgress,
) -> Vec<SourceBlocks> {
    table
        .sources()
        .iter()
        .map(|spec| {
            fetch_source_days(
                provider,
                spec,
                request.start,
                request.duration_days,
                progress,
            )
        })
        .collect()
}

/// Align each source's fetched days. Output order is table order.
pub fn align_all(
    request: &RunRequest,
    table: &SourceTable,
    fetched: &[SourceBlocks],
    options: &PipelineOptions,
) -> Vec<AlignedSeries> {
    let align = |(spec, blocks): (&SourceSpec, &SourceBlocks)| {
        SourceAligner::new(spec, options.policy).align(&blocks.days, request.duration_days)
    };

    if options.sequential {
        table.sources().iter().zip(fetched).map(align).collect()
    } else {
        table
            .sources()
            .par_iter()
            .zip(fetched.par_iter())
            .map(align)
            .collect()
    }
}

/// Run the whole pipeline for one request.
///
/// Fetch failures never abort the run; they surface as missing hours. Under
/// [`AlignPolicy::Strict`] any missing hour makes the merge fail with an
/// [`AlignmentFault`] and no rows are returned.
pub fn run_pipeline(
    request: &RunRequest,
    table: &SourceTable,
    provider: &dyn BlockProvider,
    progress: &dyn FetchProgress,
    options: &PipelineOptions,
) -> Result<PipelineOutput, PipelineError> {
    info!(
        start = %request.start,
        days = request.duration_days,
        sources = table.len(),
        provider = provider.name(),
        "collecting data"
    );

    let fetched = fetch_all(request, table, provider, progress);
    let series = align_all(request, table, &fetched, options);

    let sources: Vec<SourceSummary> = series
        .iter()
        .zip(&fetched)
        .map(|(s, b)| SourceSummary::new(s, b))
        .collect();

    for summary in &sources {
        if summary.rows == summary.expected_rows {
            info!(
                source = %summary.source,
                rows = summary.rows,
                observed = summary.stats.fill.observed,
                synthesized = summary.stats.fill.synthesized,
                substituted = summary.stats.fill.substituted,
                padded = summary.stats.padded,
                "source aligned"
            );
        } else {
            warn!(
                source = %summary.source,
                rows = summary.rows,
                expected = summary.expected_rows,
                fetch_gaps = summary.stats.fetch_gaps().count(),
                "source is short of the requested timeline"
            );
        }
    }

    let rows = merge_series(&series)?;

    Ok(PipelineOutput {
        request: *request,
        policy: options.policy,
        columns: table.column_names(),
        rows,
        sources,
    })
}
