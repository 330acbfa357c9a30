//! SciData Runner: pipeline orchestration, CSV export, run reports.
//!
//! This crate builds on `scidata-core` to provide:
//! - Input validation and source table loading
//! - Sequential fetching of every source's day list through a provider
//! - Parallel per-source alignment (declaration order kept)
//! - Strict merge into hour-indexed rows
//! - Atomic CSV export and an optional JSON run report

pub mod export;
pub mod pipeline;
pub mod report;

pub use export::{render_csv, report_file_name, save_output, write_atomic, SavedOutput};
pub use pipeline::{
    align_all, fetch_all, prepare, run_pipeline, PipelineError, PipelineOptions, PipelineOutput,
    SourceSummary,
};
pub use report::{content_hash, RunReport, SCHEMA_VERSION};
