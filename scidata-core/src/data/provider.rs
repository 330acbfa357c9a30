//! Block provider trait and structured fetch errors.
//!
//! A BlockProvider turns one source day into the text of its daily file. The
//! HTTP provider, the download-directory cache, and test doubles all sit
//! behind this trait, so the pipeline never knows where a day came from.

use crate::domain::{DayWindow, RawBlock, SourceSpec};
use thiserror::Error;

/// Why a day's file could not be obtained. Every variant is a fetch gap for
/// that day, never an abort of the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("unsupported URL scheme: {url}")]
    UnsupportedScheme { url: String },

    #[error("unsupported file format '{file_name}' (expected .txt or .zip)")]
    UnsupportedFormat { file_name: String },

    #[error("zip archive {file_name}: {message}")]
    Zip { file_name: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file_name} is not in the download directory (offline)")]
    NotCached { file_name: String },
}

/// A day's text file, as downloaded (archives already unpacked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFile {
    pub file_name: String,
    pub text: String,
}

impl DayFile {
    /// Drop the source's header lines.
    pub fn into_block(self, start_line: usize) -> RawBlock {
        RawBlock::from_text(self.file_name, &self.text, start_line)
    }
}

/// Fetches the daily file of one source day.
pub trait BlockProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(&self, source: &SourceSpec, day: &DayWindow) -> Result<DayFile, FetchError>;
}

/// Progress callback for a source's day list.
pub trait FetchProgress: Send + Sync {
    /// Called when starting to fetch a day.
    fn on_start(&self, source: &str, file_name: &str, index: usize, total: usize);

    /// Called when a day's fetch completes.
    fn on_complete(
        &self,
        source: &str,
        file_name: &str,
        index: usize,
        total: usize,
        result: &Result<(), FetchError>,
    );

    /// Called when all days of a source are done.
    fn on_batch_complete(&self, source: &str, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, source: &str, file_name: &str, index: usize, total: usize) {
        println!("[{source} {}/{}] Fetching {file_name}...", index + 1, total);
    }

    fn on_complete(
        &self,
        _source: &str,
        file_name: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), FetchError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {file_name}"),
            Err(e) => println!("  FAIL: {file_name}: {e}"),
        }
    }

    fn on_batch_complete(&self, source: &str, succeeded: usize, failed: usize, total: usize) {
        println!("{source}: {succeeded}/{total} files fetched, {failed} failed\n");
    }
}

/// Progress reporter that prints nothing.
pub struct QuietProgress;

impl FetchProgress for QuietProgress {
    fn on_start(&self, _: &str, _: &str, _: usize, _: usize) {}

    fn on_complete(&self, _: &str, _: &str, _: usize, _: usize, _: &Result<(), FetchError>) {}

    fn on_batch_complete(&self, _: &str, _: usize, _: usize, _: usize) {}
}
