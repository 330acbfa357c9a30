//! Multi-source merge by hour index.
//!
//! Series are joined position by position, so they must all have the same
//! length and that length must be the requested `duration * 24`. Anything
//! else is an [`AlignmentFault`]: a short series would shift every later
//! hour of that source onto the wrong index, so no partial table is built.

use super::align::AlignedSeries;
use crate::domain::MergedRow;
use thiserror::Error;

/// Row count of one series that did not match the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLength {
    pub source: String,
    pub rows: usize,
}

/// The series cannot be joined by hour index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentFault {
    #[error("no sources to merge")]
    NoSources,

    #[error("sources disagree on timeline length: {}", describe_expected(.expected))]
    ExpectedLengthMismatch { expected: Vec<SeriesLength> },

    #[error(
        "series length mismatch (expected {expected} rows): {}",
        describe_lengths(.mismatched)
    )]
    LengthMismatch {
        expected: usize,
        mismatched: Vec<SeriesLength>,
    },
}

fn describe_lengths(lengths: &[SeriesLength]) -> String {
    lengths
        .iter()
        .map(|l| format!("{} has {} rows", l.source, l.rows))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_expected(lengths: &[SeriesLength]) -> String {
    lengths
        .iter()
        .map(|l| format!("{} expects {}", l.source, l.rows))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join the series row by row, in the order given.
pub fn merge_series(series: &[AlignedSeries]) -> Result<Vec<MergedRow>, AlignmentFault> {
    let first = series.first().ok_or(AlignmentFault::NoSources)?;
    let expected = first.expected_len;

    if series.iter().any(|s| s.expected_len != expected) {
        return Err(AlignmentFault::ExpectedLengthMismatch {
            expected: series
                .iter()
                .map(|s| SeriesLength {
                    source: s.source.clone(),
                    rows: s.expected_len,
                })
                .collect(),
        });
    }

    let mismatched: Vec<SeriesLength> = series
        .iter()
        .filter(|s| s.rows.len() != expected)
        .map(|s| SeriesLength {
            source: s.source.clone(),
            rows: s.rows.len(),
        })
        .collect();
    if !mismatched.is_empty() {
        return Err(AlignmentFault::LengthMismatch {
            expected,
            mismatched,
        });
    }

    let width: usize = series.iter().map(|s| s.width).sum();
    let merged = (0..expected)
        .map(|hour| {
            let mut values = Vec::with_capacity(width);
            for s in series {
                values.extend(s.rows[hour].values().iter().cloned());
            }
            MergedRow { hour, values }
        })
        .collect();

    Ok(merged)
}
