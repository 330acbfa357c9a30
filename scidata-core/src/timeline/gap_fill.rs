//! Hourly gap filling.
//!
//! Turns one day's chronological records into a contiguous run of hourly
//! rows covering `[window.start, window.end)`:
//!
//! - a top-of-hour record (minute 0) inside the window becomes a real row
//! - hours skipped between records become null rows, with a warning each
//! - records that are not at the top of the hour are otherwise ignored
//!
//! The scan is a fold over [`FillState`]: [`FillState::step`] takes one
//! observation and returns the next state plus what it emitted. Rows are only
//! ever emitted for the next expected hour, so a day's output is always the
//! contiguous range `[window.start, state.next_expected)`. Hours after the
//! last usable record are *not* emitted here; the aligner decides what to do
//! with a short day.

use super::extract::{ParseFault, RawLine};
use crate::domain::{HourWindow, HourlyRow, RowOrigin, SourceSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What a record carries, by its minute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    /// Minute 0, with the selected values.
    TopOfHour(Vec<String>),
    /// Any other minute; only its hour matters.
    Intra { minute: u32 },
}

/// One classified record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub hour: u32,
    pub reading: Reading,
}

impl Observation {
    pub fn top_of_hour(hour: u32, values: Vec<String>) -> Self {
        Self {
            hour,
            reading: Reading::TopOfHour(values),
        }
    }

    pub fn intra(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            reading: Reading::Intra { minute },
        }
    }

    pub fn is_top_of_hour(&self) -> bool {
        matches!(self.reading, Reading::TopOfHour(_))
    }
}

/// What one step of the fold produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// No record for this hour; the caller writes a null row.
    Missing { hour: u32 },
    /// Top-of-hour record accepted as the row for this hour.
    Sample { hour: u32, row: HourlyRow },
    /// Top-of-hour record for an hour that was already emitted; dropped.
    Stale { hour: u32 },
}

/// Running state of the scan: the next hour that still needs a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillState {
    pub next_expected: u32,
}

impl FillState {
    pub fn new(window: HourWindow) -> Self {
        Self {
            next_expected: window.start,
        }
    }

    /// Fold one observation into the state.
    pub fn step(self, window: HourWindow, obs: Observation) -> (FillState, Vec<Emission>) {
        let mut next = self.next_expected;
        let mut emitted = Vec::new();

        if obs.hour > next && obs.hour < window.end {
            // A record past the top of the hour means that hour's own sample
            // is missing too.
            let gap_end = if obs.is_top_of_hour() {
                obs.hour
            } else {
                obs.hour + 1
            };
            emitted.extend((next..gap_end).map(|hour| Emission::Missing { hour }));
            next = obs.hour + 1;
        }

        if let Reading::TopOfHour(values) = obs.reading {
            if window.contains(obs.hour) {
                if obs.hour < self.next_expected {
                    emitted.push(Emission::Stale { hour: obs.hour });
                } else {
                    emitted.push(Emission::Sample {
                        hour: obs.hour,
                        row: HourlyRow::observed(values),
                    });
                    next = obs.hour + 1;
                }
            }
        }

        (FillState { next_expected: next }, emitted)
    }
}

/// Counters for one filled day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStats {
    pub observed: usize,
    pub substituted: usize,
    pub synthesized: usize,
    pub stale: usize,
    pub parse_faults: usize,
}

impl FillStats {
    pub fn absorb(&mut self, other: &FillStats) {
        self.observed += other.observed;
        self.substituted += other.substituted;
        self.synthesized += other.synthesized;
        self.stale += other.stale;
        self.parse_faults += other.parse_faults;
    }
}

/// Output of filling one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFill {
    /// Rows for hours `[window.start, next_expected)`, in order.
    pub rows: Vec<HourlyRow>,
    /// First hour with no row.
    pub next_expected: u32,
    pub stats: FillStats,
}

/// Gap filler for one day of one source.
pub struct HourlyGapFiller<'a> {
    spec: &'a SourceSpec,
    window: HourWindow,
    file: &'a str,
}

impl<'a> HourlyGapFiller<'a> {
    pub fn new(spec: &'a SourceSpec, window: HourWindow, file: &'a str) -> Self {
        Self { spec, window, file }
    }

    /// Classify a line; values are extracted only for top-of-hour records.
    pub fn classify(&self, line: &str) -> Result<Observation, ParseFault> {
        let raw = RawLine::parse(line);
        let (hour, minute) = raw.time(&self.spec.time_layout)?;
        if minute == 0 {
            Ok(Observation::top_of_hour(hour, raw.values(&self.spec.value_columns)?))
        } else {
            Ok(Observation::intra(hour, minute))
        }
    }

    /// Fill the day from its data lines.
    pub fn fill<I, S>(&self, lines: I) -> DayFill
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let width = self.spec.width();
        let mut state = FillState::new(self.window);
        let mut rows = Vec::with_capacity(self.window.hours());
        let mut stats = FillStats::default();

        for (n, line) in lines.into_iter().enumerate() {
            let obs = match self.classify(line.as_ref()) {
                Ok(obs) => obs,
                Err(fault) => {
                    debug!(source = %self.spec.name, file = self.file, line = n + 1, %fault, "skipping unusable line");
                    stats.parse_faults += 1;
                    continue;
                }
            };

            let (next, emitted) = state.step(self.window, obs);
            state = next;

            for emission in emitted {
                match emission {
                    Emission::Missing { hour } => {
                        warn!(
                            source = %self.spec.name,
                            file = self.file,
                            hour,
                            "missing hourly data; row nullified"
                        );
                        stats.synthesized += 1;
                        rows.push(HourlyRow::null(width, RowOrigin::Synthesized));
                    }
                    Emission::Sample { hour, row } => {
                        if row.origin() == RowOrigin::Substituted {
                            warn!(
                                source = %self.spec.name,
                                file = self.file,
                                hour,
                                "sentinel value in record; row nullified"
                            );
                            stats.substituted += 1;
                        } else {
                            stats.observed += 1;
                        }
                        rows.push(row);
                    }
                    Emission::Stale { hour } => {
                        debug!(source = %self.spec.name, file = self.file, hour, "duplicate or out-of-order record dropped");
                        stats.stale += 1;
                    }
                }
            }
        }

        if stats.parse_faults > 0 {
            warn!(
                source = %self.spec.name,
                file = self.file,
                count = stats.parse_faults,
                "skipped unusable lines"
            );
        }

        debug_assert_eq!(
            rows.len(),
            (state.next_expected - self.window.start) as usize
        );

        DayFill {
            rows,
            next_expected: state.next_expected,
            stats,
        }
    }
}
