//! Hourly and merged rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value written for every column of a missing or invalid hour.
pub const NULL_VALUE: &str = "0";

/// Raw fill values the instruments use for "no measurement".
pub const DOMAIN_SENTINELS: [&str; 2] = ["-9999.9", "-999.9"];

/// How an hourly row came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowOrigin {
    /// Copied from a top-of-hour record.
    Observed,
    /// A top-of-hour record carried a domain sentinel; the whole row was nulled.
    Substituted,
    /// Gap inside a day, filled while scanning.
    Synthesized,
    /// Hour never reached by the day's records (or the day was not fetched),
    /// nulled by the aligner's padding policy.
    Padded,
}

/// One hour of one source: a fixed-width tuple of string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRow {
    values: Vec<String>,
    origin: RowOrigin,
}

impl HourlyRow {
    /// Build a row from a top-of-hour record's selected values.
    ///
    /// Any domain sentinel taints the whole row.
    pub fn observed(values: Vec<String>) -> Self {
        if values
            .iter()
            .any(|v| DOMAIN_SENTINELS.contains(&v.as_str()))
        {
            return Self::null(values.len(), RowOrigin::Substituted);
        }
        Self {
            values,
            origin: RowOrigin::Observed,
        }
    }

    /// An all-`"0"` row of the given width.
    pub fn null(width: usize, origin: RowOrigin) -> Self {
        Self {
            values: vec![NULL_VALUE.to_string(); width],
            origin,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn origin(&self) -> RowOrigin {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// One output line: hour index followed by every source's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRow {
    pub hour: usize,
    pub values: Vec<String>,
}

impl MergedRow {
    /// Fields in output order, hour index first.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.values.len() + 1);
        fields.push(self.hour.to_string());
        fields.extend(self.values.iter().cloned());
        fields
    }
}

impl fmt::Display for MergedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hour)?;
        for v in &self.values {
            write!(f, ",{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn observed_row_keeps_values() {
        let row = HourlyRow::observed(strings(&["2.7", "317.5"]));
        assert_eq!(row.values(), &strings(&["2.7", "317.5"])[..]);
        assert_eq!(row.origin(), RowOrigin::Observed);
    }

    #[test]
    fn one_sentinel_taints_the_whole_row() {
        let row = HourlyRow::observed(strings(&["1.0", "-999.9", "3.0"]));
        assert_eq!(row.values(), &strings(&["0", "0", "0"])[..]);
        assert_eq!(row.origin(), RowOrigin::Substituted);

        let row = HourlyRow::observed(strings(&["-9999.9", "317.5"]));
        assert_eq!(row.width(), 2);
        assert_eq!(row.origin(), RowOrigin::Substituted);
    }

    #[test]
    fn similar_numbers_are_not_sentinels() {
        let row = HourlyRow::observed(strings(&["-99.9", "-9999.90"]));
        assert_eq!(row.origin(), RowOrigin::Observed);
    }

    #[test]
    fn merged_row_renders_comma_joined() {
        let row = MergedRow {
            hour: 7,
            values: strings(&["1", "2", "0"]),
        };
        assert_eq!(row.to_string(), "7,1,2,0");
        assert_eq!(row.fields(), strings(&["7", "1", "2", "0"]));
    }
}
