//! Day-list fetch: one source's days through a provider, with progress reporting.

use super::provider::{BlockProvider, FetchError, FetchProgress};
use crate::domain::{DayWindow, RawBlock, SourceSpec};
use chrono::NaiveDate;
use tracing::warn;

/// A source's day list with the block of every day that could be fetched.
#[derive(Debug)]
pub struct SourceBlocks {
    pub source: String,
    /// In day-list order; `None` marks a fetch gap.
    pub days: Vec<(DayWindow, Option<RawBlock>)>,
    pub errors: Vec<(DayWindow, FetchError)>,
}

impl SourceBlocks {
    pub fn fetched(&self) -> usize {
        self.days.iter().filter(|(_, b)| b.is_some()).count()
    }

    pub fn all_fetched(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fetch every day the source needs for `duration_days` days from `start`.
///
/// Failures are recorded and turned into fetch gaps; they never stop the
/// remaining days.
pub fn fetch_source_days(
    provider: &dyn BlockProvider,
    source: &SourceSpec,
    start: NaiveDate,
    duration_days: u32,
    progress: &dyn FetchProgress,
) -> SourceBlocks {
    let windows = source.day_windows(start, duration_days);
    let total = windows.len();
    let mut days = Vec::with_capacity(total);
    let mut errors = Vec::new();

    for day in windows {
        let file_name = source.file_name_for(&day);
        progress.on_start(&source.name, &file_name, day.index, total);

        let mut block = None;
        let result = provider.fetch(source, &day).map(|file| {
            block = Some(file.into_block(source.start_line));
        });
        progress.on_complete(&source.name, &file_name, day.index, total, &result);

        if let Err(e) = result {
            warn!(source = %source.name, url = %source.url_for(&day), error = %e, "no file for day");
            errors.push((day, e));
        }
        days.push((day, block));
    }

    progress.on_batch_complete(&source.name, total - errors.len(), errors.len(), total);

    SourceBlocks {
        source: source.name.clone(),
        days,
        errors,
    }
}
