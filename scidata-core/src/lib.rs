//! SciData Core: domain types, hourly gap filling, source alignment, merge, providers.
//!
//! This crate contains the alignment pipeline's building blocks:
//! - Domain types (source specs, day windows, raw blocks, hourly and merged rows)
//! - Line time extraction for combined HHMM and separate hour/minute layouts
//! - Hourly gap filling as an explicit fold over [`timeline::FillState`]
//! - Per-source alignment onto the requested `duration * 24` hour timeline
//! - Position-wise merge that refuses series of unequal length
//! - Source table configuration and run inputs
//! - Block providers: HTTP/zip/local files behind a download-directory cache

pub mod config;
pub mod data;
pub mod domain;
pub mod timeline;
