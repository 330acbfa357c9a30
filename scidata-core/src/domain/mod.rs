//! Domain types for the hourly alignment pipeline

pub mod block;
pub mod day;
pub mod row;
pub mod source;

pub use block::RawBlock;
pub use day::{DayPosition, DayWindow, HourWindow};
pub use row::{HourlyRow, MergedRow, RowOrigin, DOMAIN_SENTINELS, NULL_VALUE};
pub use source::{SourceSpec, TimeLayout};
