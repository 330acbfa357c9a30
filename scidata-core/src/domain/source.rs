//! SourceSpec: the immutable descriptor of one measurement source.

use super::day::{DayPosition, DayWindow, HourWindow};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// How a source encodes the time of day of each record.
///
/// Column numbers are 1-based, matching the whitespace-separated layout of the
/// raw files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeLayout {
    /// One `HHMM` column (ACE lists).
    Combined { column: usize },
    /// Hour and minute in their own columns.
    Separate {
        hour_column: usize,
        minute_column: usize,
    },
}

impl TimeLayout {
    /// Equal columns signal the combined `HHMM` encoding.
    pub fn from_columns(hour_column: usize, minute_column: usize) -> Self {
        if hour_column == minute_column {
            TimeLayout::Combined {
                column: hour_column,
            }
        } else {
            TimeLayout::Separate {
                hour_column,
                minute_column,
            }
        }
    }

    pub fn hour_column(&self) -> usize {
        match *self {
            TimeLayout::Combined { column } => column,
            TimeLayout::Separate { hour_column, .. } => hour_column,
        }
    }

    pub fn minute_column(&self) -> usize {
        match *self {
            TimeLayout::Combined { column } => column,
            TimeLayout::Separate { minute_column, .. } => minute_column,
        }
    }
}

/// Immutable description of a source: where its daily files live, how its
/// clock relates to the requested start date, and which columns to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    /// URL with `{Y}`, `{M}`, `{D}` placeholders.
    pub url_template: String,
    /// Hour shift of the source's clock relative to the requested date.
    pub offset_hours: i32,
    /// 1-based line number of the first data record.
    pub start_line: usize,
    pub time_layout: TimeLayout,
    /// 1-based value columns, in output order.
    pub value_columns: Vec<usize>,
}

impl SourceSpec {
    /// Local hour at which the first requested hour begins (`offset mod 24`).
    pub fn start_hour(&self) -> u32 {
        self.offset_hours.rem_euclid(24) as u32
    }

    /// Number of values per hourly row.
    pub fn width(&self) -> usize {
        self.value_columns.len()
    }

    /// True when the offset does not shift the local day boundary.
    pub fn is_day_aligned(&self) -> bool {
        self.offset_hours % 24 == 0
    }

    /// Number of daily files needed to cover `duration_days` requested days.
    pub fn day_count(&self, duration_days: u32) -> usize {
        if self.is_day_aligned() {
            duration_days as usize
        } else {
            duration_days as usize + 1
        }
    }

    /// Calendar days whose files cover the requested range.
    pub fn day_windows(&self, start: NaiveDate, duration_days: u32) -> Vec<DayWindow> {
        let first = start.and_time(NaiveTime::MIN)
            + chrono::Duration::hours(i64::from(self.offset_hours));
        (0..self.day_count(duration_days))
            .map(|i| DayWindow {
                index: i,
                date: (first + chrono::Duration::days(i as i64)).date(),
            })
            .collect()
    }

    /// Hour bounds for a day at the given position in the day list.
    pub fn hour_window(&self, position: DayPosition) -> HourWindow {
        let start_hour = self.start_hour();
        match position {
            DayPosition::First | DayPosition::Only => HourWindow::new(start_hour, 24),
            DayPosition::Middle => HourWindow::new(0, 24),
            DayPosition::Last => {
                HourWindow::new(0, if start_hour == 0 { 24 } else { start_hour })
            }
        }
    }

    /// Expand the URL template for one day.
    pub fn url_for(&self, day: &DayWindow) -> String {
        self.url_template
            .replace("{Y}", &format!("{:04}", day.year()))
            .replace("{M}", &format!("{:02}", day.month()))
            .replace("{D}", &format!("{:02}", day.day()))
    }

    /// File name of the day's text file (archives are named after their text entry).
    pub fn file_name_for(&self, day: &DayWindow) -> String {
        let url = self.url_for(day);
        let name = url.rsplit('/').next().unwrap_or(url.as_str());
        match name.strip_suffix(".zip") {
            Some(stem) => format!("{stem}.txt"),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ace() -> SourceSpec {
        SourceSpec {
            name: "ACE_swepam".into(),
            url_template: "https://host/ace/{Y}{M}{D}_ace_swepam_1m.txt".into(),
            offset_hours: -3,
            start_line: 19,
            time_layout: TimeLayout::from_columns(4, 4),
            value_columns: vec![8, 9],
        }
    }

    fn msc() -> SourceSpec {
        SourceSpec {
            name: "MSC_mag".into(),
            url_template: "http://host/mos{Y}{M}/mos{Y}{M}{D}t.zip".into(),
            offset_hours: 0,
            start_line: 7,
            time_layout: TimeLayout::from_columns(4, 5),
            value_columns: vec![7, 8, 9],
        }
    }

    #[test]
    fn time_layout_serializes_tagged() {
        let json = serde_json::to_string(&TimeLayout::from_columns(4, 4)).unwrap();
        assert_eq!(json, r#"{"type":"combined","column":4}"#);
        let back: TimeLayout =
            serde_json::from_str(r#"{"type":"separate","hour_column":4,"minute_column":5}"#)
                .unwrap();
        assert_eq!(back, TimeLayout::from_columns(4, 5));
    }

    #[test]
    fn equal_columns_are_combined() {
        assert_eq!(TimeLayout::from_columns(4, 4), TimeLayout::Combined { column: 4 });
        assert_eq!(
            TimeLayout::from_columns(4, 5),
            TimeLayout::Separate {
                hour_column: 4,
                minute_column: 5
            }
        );
    }

    #[test]
    fn negative_offset_starts_at_hour_21() {
        assert_eq!(ace().start_hour(), 21);
        assert_eq!(ace().hour_window(DayPosition::First), HourWindow::new(21, 24));
        assert_eq!(ace().hour_window(DayPosition::Last), HourWindow::new(0, 21));
    }

    #[test]
    fn aligned_source_uses_full_days() {
        let msc = msc();
        assert_eq!(msc.start_hour(), 0);
        assert_eq!(msc.hour_window(DayPosition::First), HourWindow::new(0, 24));
        assert_eq!(msc.hour_window(DayPosition::Last), HourWindow::new(0, 24));
    }

    #[test]
    fn offset_source_needs_an_extra_day() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let days = ace().day_windows(start, 2);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert_eq!(days[2].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());

        let days = msc().day_windows(start, 2);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, start);
    }

    #[test]
    fn multiple_of_24_offset_needs_no_extra_day() {
        let mut spec = msc();
        spec.offset_hours = 24;
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let days = spec.day_windows(start, 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    }

    #[test]
    fn url_template_is_zero_padded() {
        let day = DayWindow {
            index: 0,
            date: NaiveDate::from_ymd_opt(2020, 3, 7).unwrap(),
        };
        assert_eq!(ace().url_for(&day), "https://host/ace/20200307_ace_swepam_1m.txt");
        assert_eq!(msc().url_for(&day), "http://host/mos202003/mos20200307t.zip");
        assert_eq!(msc().file_name_for(&day), "mos20200307t.txt");
        assert_eq!(ace().file_name_for(&day), "20200307_ace_swepam_1m.txt");
    }
}
