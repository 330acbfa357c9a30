//! Source table and run request configuration.
//!
//! The source table is an ordered list of [`SourceSpec`]s, stored as TOML:
//!
//! ```toml
//! [[source]]
//! name = "ACE_swepam"
//! url_template = "https://example.org/ace/{Y}{M}{D}_ace_swepam_1m.txt"
//! offset_hours = -3
//! start_line = 19
//! hour_column = 4
//! minute_column = 4
//! value_columns = [8, 9]
//! ```
//!
//! Equal hour and minute columns select the combined `HHMM` layout.
//! Declaration order is output column order.

use crate::domain::{SourceSpec, TimeLayout};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// ACE SWEPAM 1-minute solar wind lists (density, speed).
pub const ACE_SWEPAM_URL: &str =
    "https://sohoftp.nascom.nasa.gov/sdb/goes/ace/daily/{Y}{M}{D}_ace_swepam_1m.txt";
/// ACE MAG 1-minute interplanetary field lists (Bx, By, Bz).
pub const ACE_MAG_URL: &str =
    "https://sohoftp.nascom.nasa.gov/sdb/goes/ace/daily/{Y}{M}{D}_ace_mag_1m.txt";
/// IZMIRAN Moscow magnetometer daily archives.
pub const MSC_MAG_URL: &str = "http://forecast.izmiran.rssi.ru/BANK/mos/mos{Y}{M}/mos{Y}{M}{D}t.zip";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read source table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse source table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid source table: {0}")]
    Invalid(String),
}

/// One `[[source]]` entry as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SourceEntry {
    name: String,
    url_template: String,
    offset_hours: i32,
    start_line: usize,
    hour_column: usize,
    minute_column: usize,
    value_columns: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SourceFile {
    #[serde(rename = "source")]
    sources: Vec<SourceEntry>,
}

impl From<&SourceSpec> for SourceEntry {
    fn from(spec: &SourceSpec) -> Self {
        Self {
            name: spec.name.clone(),
            url_template: spec.url_template.clone(),
            offset_hours: spec.offset_hours,
            start_line: spec.start_line,
            hour_column: spec.time_layout.hour_column(),
            minute_column: spec.time_layout.minute_column(),
            value_columns: spec.value_columns.clone(),
        }
    }
}

impl From<SourceEntry> for SourceSpec {
    fn from(entry: SourceEntry) -> Self {
        Self {
            name: entry.name,
            url_template: entry.url_template,
            offset_hours: entry.offset_hours,
            start_line: entry.start_line,
            time_layout: TimeLayout::from_columns(entry.hour_column, entry.minute_column),
            value_columns: entry.value_columns,
        }
    }
}

/// The immutable, ordered set of sources for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    sources: Vec<SourceSpec>,
}

impl SourceTable {
    /// Build and validate a table.
    pub fn new(sources: Vec<SourceSpec>) -> Result<Self, ConfigError> {
        validate(&sources)?;
        Ok(Self { sources })
    }

    /// Load a source table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a source table from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: SourceFile = toml::from_str(content)?;
        Self::new(file.sources.into_iter().map(SourceSpec::from).collect())
    }

    /// Render the table back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = SourceFile {
            sources: self.sources.iter().map(SourceEntry::from).collect(),
        };
        toml::to_string_pretty(&file).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The three space-weather sources: ACE SWEPAM, ACE MAG, Moscow magnetometer.
    pub fn space_weather() -> Self {
        Self {
            sources: vec![
                SourceSpec {
                    name: "ACE_swepam".into(),
                    url_template: ACE_SWEPAM_URL.into(),
                    offset_hours: -3,
                    start_line: 19,
                    time_layout: TimeLayout::from_columns(4, 4),
                    value_columns: vec![8, 9],
                },
                SourceSpec {
                    name: "ACE_mag".into(),
                    url_template: ACE_MAG_URL.into(),
                    offset_hours: -3,
                    start_line: 21,
                    time_layout: TimeLayout::from_columns(4, 4),
                    value_columns: vec![8, 9, 10],
                },
                SourceSpec {
                    name: "MSC_mag".into(),
                    url_template: MSC_MAG_URL.into(),
                    offset_hours: 0,
                    start_line: 7,
                    time_layout: TimeLayout::from_columns(4, 5),
                    value_columns: vec![7, 8, 9],
                },
            ],
        }
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Output column names: `hour_index` then `<source>_v1..` per source.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["hour_index".to_string()];
        for source in &self.sources {
            let prefix = source.name.to_lowercase();
            names.extend((1..=source.width()).map(|i| format!("{prefix}_v{i}")));
        }
        names
    }
}

impl Default for SourceTable {
    fn default() -> Self {
        Self::space_weather()
    }
}

fn validate(sources: &[SourceSpec]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Invalid("at least one source is required".into()));
    }
    let mut seen = HashSet::new();
    for s in sources {
        if s.name.trim().is_empty() {
            return Err(ConfigError::Invalid("source name is empty".into()));
        }
        if !seen.insert(s.name.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate source '{}'", s.name)));
        }
        if s.start_line == 0 {
            return Err(ConfigError::Invalid(format!(
                "{}: start_line is 1-based",
                s.name
            )));
        }
        if s.time_layout.hour_column() == 0 || s.time_layout.minute_column() == 0 {
            return Err(ConfigError::Invalid(format!(
                "{}: time columns are 1-based",
                s.name
            )));
        }
        if s.value_columns.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{}: no value columns",
                s.name
            )));
        }
        if s.value_columns.contains(&0) {
            return Err(ConfigError::Invalid(format!(
                "{}: value columns are 1-based",
                s.name
            )));
        }
    }
    Ok(())
}

/// Invalid run request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("start date '{0}' is not DD/MM/YYYY (years 1900-2099)")]
    BadStartDate(String),

    #[error("duration must be > 0 days (got {0})")]
    BadDuration(i64),
}

/// What to fetch: a start date and a number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub start: NaiveDate,
    pub duration_days: u32,
}

impl RunRequest {
    pub fn new(start: NaiveDate, duration_days: u32) -> Result<Self, InputError> {
        if duration_days == 0 {
            return Err(InputError::BadDuration(0));
        }
        Ok(Self {
            start,
            duration_days,
        })
    }

    /// Parse `DD/MM/YYYY` (also `-`, `.` or space separated) and a day count.
    pub fn parse(start: &str, duration_days: i64) -> Result<Self, InputError> {
        let start = parse_start_date(start)?;
        let duration = u32::try_from(duration_days)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(InputError::BadDuration(duration_days))?;
        Self::new(start, duration)
    }

    /// Number of hourly rows the run produces.
    pub fn hours(&self) -> usize {
        self.duration_days as usize * 24
    }

    /// `DD_MM_YYYY_+N.csv`
    pub fn output_file_name(&self) -> String {
        format!(
            "{}_+{}.csv",
            self.start.format("%d_%m_%Y"),
            self.duration_days
        )
    }
}

fn parse_start_date(raw: &str) -> Result<NaiveDate, InputError> {
    let bad = || InputError::BadStartDate(raw.to_string());
    let parts: Vec<&str> = raw.trim().split(['/', '-', '.', ' ']).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(bad());
    };
    if day.len() != 2 || month.len() != 2 || year.len() != 4 {
        return Err(bad());
    }
    let day: u32 = day.parse().map_err(|_| bad())?;
    let month: u32 = month.parse().map_err(|_| bad())?;
    let year: i32 = year.parse().map_err(|_| bad())?;
    if !(1900..=2099).contains(&year) {
        return Err(bad());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}
