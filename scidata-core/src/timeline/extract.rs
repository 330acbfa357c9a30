//! Line time extraction.
//!
//! A raw record is a whitespace-separated line. Its time of day is read
//! according to the source's [`TimeLayout`]; its values are the configured
//! columns, in order. Any failure is a [`ParseFault`] and the caller skips
//! the line.

use crate::domain::TimeLayout;
use thiserror::Error;

/// Why a line could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFault {
    #[error("column {column} is missing (line has {len} fields)")]
    MissingColumn { column: usize, len: usize },

    #[error("column {column} is not an integer: '{value}'")]
    NotNumeric { column: usize, value: String },

    #[error("{field} {value} out of range")]
    OutOfRange { field: &'static str, value: u32 },

    #[error("column {column} is not an HHMM time: '{value}'")]
    MalformedHhmm { column: usize, value: String },
}

/// A whitespace-tokenized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> RawLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
        }
    }

    /// 1-based column access.
    pub fn column(&self, column: usize) -> Result<&'a str, ParseFault> {
        column
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .copied()
            .ok_or(ParseFault::MissingColumn {
                column,
                len: self.tokens.len(),
            })
    }

    /// `(hour, minute)` of the record.
    pub fn time(&self, layout: &TimeLayout) -> Result<(u32, u32), ParseFault> {
        let (hour, minute) = match *layout {
            TimeLayout::Separate {
                hour_column,
                minute_column,
            } => (
                self.integer(hour_column)?,
                self.integer(minute_column)?,
            ),
            TimeLayout::Combined { column } => parse_hhmm(column, self.column(column)?)?,
        };
        if hour > 23 {
            return Err(ParseFault::OutOfRange {
                field: "hour",
                value: hour,
            });
        }
        if minute > 59 {
            return Err(ParseFault::OutOfRange {
                field: "minute",
                value: minute,
            });
        }
        Ok((hour, minute))
    }

    /// Selected value columns, order-preserving.
    pub fn values(&self, columns: &[usize]) -> Result<Vec<String>, ParseFault> {
        columns
            .iter()
            .map(|&c| self.column(c).map(str::to_string))
            .collect()
    }

    fn integer(&self, column: usize) -> Result<u32, ParseFault> {
        let raw = self.column(column)?;
        raw.parse().map_err(|_| ParseFault::NotNumeric {
            column,
            value: raw.to_string(),
        })
    }
}

fn parse_hhmm(column: usize, raw: &str) -> Result<(u32, u32), ParseFault> {
    let malformed = || ParseFault::MalformedHhmm {
        column,
        value: raw.to_string(),
    };
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let hour = raw[..2].parse().map_err(|_| malformed())?;
    let minute = raw[2..].parse().map_err(|_| malformed())?;
    Ok((hour, minute))
}
