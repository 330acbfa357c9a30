//! Temporal alignment: line time extraction, hourly gap filling, per-source
//! alignment and multi-source merge.

pub mod align;
pub mod extract;
pub mod gap_fill;
pub mod merge;

pub use align::{AlignPolicy, AlignedSeries, DayShortfall, SourceAligner, SourceStats};
pub use extract::{ParseFault, RawLine};
pub use gap_fill::{DayFill, Emission, FillState, FillStats, HourlyGapFiller, Observation, Reading};
pub use merge::{merge_series, AlignmentFault, SeriesLength};
