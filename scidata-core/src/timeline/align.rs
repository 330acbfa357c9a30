//! Per-source alignment onto the requested hourly timeline.
//!
//! Each day of a source's day list is gap-filled inside its own hour window:
//! the first day starts at the source's local start hour, the last day stops
//! there, and middle days are whole. Concatenated, the windows cover exactly
//! `duration * 24` hours, so index 0 of the series is the first requested hour.
//!
//! Days that could not be fetched, and days whose records stop early, leave
//! the series short. Under [`AlignPolicy::Strict`] the shortfall is recorded
//! and left for the merge to reject; under [`AlignPolicy::PadMissing`] the
//! missing hours are filled with null rows at their exact positions and
//! flagged in the stats.

use super::gap_fill::{FillStats, HourlyGapFiller};
use crate::domain::{
    DayPosition, DayWindow, HourWindow, HourlyRow, RawBlock, RowOrigin, SourceSpec,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do with hours a day did not deliver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignPolicy {
    /// Leave the series short; the merge reports an alignment fault.
    #[default]
    Strict,
    /// Fill undelivered hours with null rows and flag them.
    PadMissing,
}

/// A day that delivered fewer rows than its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShortfall {
    pub date: NaiveDate,
    pub expected: usize,
    pub delivered: usize,
    /// The day's file was never obtained.
    pub fetch_gap: bool,
}

/// Per-source counters across all days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub days_requested: usize,
    pub days_fetched: usize,
    #[serde(flatten)]
    pub fill: FillStats,
    pub padded: usize,
    pub shortfalls: Vec<DayShortfall>,
}

impl SourceStats {
    pub fn fetch_gaps(&self) -> impl Iterator<Item = &DayShortfall> {
        self.shortfalls.iter().filter(|s| s.fetch_gap)
    }

    /// Hours missing from the series (before any padding).
    pub fn missing_hours(&self) -> usize {
        self.shortfalls
            .iter()
            .map(|s| s.expected - s.delivered)
            .sum()
    }
}

/// One source's rows on the canonical timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeries {
    pub source: String,
    pub width: usize,
    pub rows: Vec<HourlyRow>,
    /// `duration * 24`.
    pub expected_len: usize,
    pub stats: SourceStats,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.expected_len
    }
}

/// Drives the gap filler across one source's days.
pub struct SourceAligner<'a> {
    spec: &'a SourceSpec,
    policy: AlignPolicy,
}

impl<'a> SourceAligner<'a> {
    pub fn new(spec: &'a SourceSpec, policy: AlignPolicy) -> Self {
        Self { spec, policy }
    }

    /// Window for the day at `index` in a list of `count` days.
    pub fn window_for(&self, index: usize, count: usize) -> HourWindow {
        self.spec.hour_window(DayPosition::of(index, count))
    }

    /// Align the source's days. `days` is the day list in order, with `None`
    /// for days whose file could not be obtained.
    pub fn align(
        &self,
        days: &[(DayWindow, Option<RawBlock>)],
        duration_days: u32,
    ) -> AlignedSeries {
        let count = days.len();
        let width = self.spec.width();
        let mut rows = Vec::with_capacity(duration_days as usize * 24);
        let mut stats = SourceStats {
            days_requested: count,
            ..SourceStats::default()
        };

        for (i, (day, block)) in days.iter().enumerate() {
            let window = self.window_for(i, count);

            let (delivered, covered_until) = match block {
                Some(block) => {
                    stats.days_fetched += 1;
                    if block.is_empty() {
                        warn!(source = %self.spec.name, day = %day, file = %block.file_name, "file has no data lines");
                    }
                    let filled = HourlyGapFiller::new(self.spec, window, &block.file_name)
                        .fill(&block.lines);
                    stats.fill.absorb(&filled.stats);
                    let delivered = filled.rows.len();
                    rows.extend(filled.rows);
                    (delivered, filled.next_expected)
                }
                None => {
                    warn!(source = %self.spec.name, day = %day, "no data for day; its hours are missing");
                    (0, window.start)
                }
            };

            if delivered < window.hours() {
                stats.shortfalls.push(DayShortfall {
                    date: day.date,
                    expected: window.hours(),
                    delivered,
                    fetch_gap: block.is_none(),
                });

                if self.policy == AlignPolicy::PadMissing {
                    for hour in covered_until..window.end {
                        warn!(source = %self.spec.name, day = %day, hour, "hour not delivered; padded with null row");
                        rows.push(HourlyRow::null(width, RowOrigin::Padded));
                    }
                    stats.padded += window.hours() - delivered;
                }
            }
        }

        AlignedSeries {
            source: self.spec.name.clone(),
            width,
            rows,
            expected_len: duration_days as usize * 24,
            stats,
        }
    }
}
