//! Fetching source days: providers, download cache, and the day-list loop

pub mod cache;
pub mod download;
pub mod http;
pub mod provider;

pub use cache::CachedProvider;
pub use download::{fetch_source_days, SourceBlocks};
pub use http::{decode_payload, HttpProvider};
pub use provider::{
    BlockProvider, DayFile, FetchError, FetchProgress, QuietProgress, StdoutProgress,
};
