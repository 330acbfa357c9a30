//! Day lists and per-day hour windows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One calendar day in a source's day list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayWindow {
    /// Position in the source's day list (0-based).
    pub index: usize,
    pub date: NaiveDate,
}

impl DayWindow {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%d/%m/%Y"))
    }
}

/// Where a day sits in its source's day list; decides the hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPosition {
    /// The list has a single day.
    Only,
    First,
    Middle,
    Last,
}

impl DayPosition {
    pub fn of(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 0 | 1) => DayPosition::Only,
            (0, _) => DayPosition::First,
            (i, n) if i + 1 == n => DayPosition::Last,
            _ => DayPosition::Middle,
        }
    }
}

/// Half-open range of local hours `[start, end)` kept from one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Number of hourly rows the window should yield.
    pub fn hours(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_in_day_list() {
        assert_eq!(DayPosition::of(0, 1), DayPosition::Only);
        assert_eq!(DayPosition::of(0, 3), DayPosition::First);
        assert_eq!(DayPosition::of(1, 3), DayPosition::Middle);
        assert_eq!(DayPosition::of(2, 3), DayPosition::Last);
        assert_eq!(DayPosition::of(1, 2), DayPosition::Last);
    }

    #[test]
    fn window_bounds() {
        let w = HourWindow::new(21, 24);
        assert_eq!(w.hours(), 3);
        assert!(w.contains(21));
        assert!(w.contains(23));
        assert!(!w.contains(24));
        assert!(!w.contains(20));
    }

    #[test]
    fn day_window_display() {
        let day = DayWindow {
            index: 0,
            date: NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
        };
        assert_eq!(day.to_string(), "31/12/2019");
        assert_eq!((day.day(), day.month(), day.year()), (31, 12, 2019));
    }
}
