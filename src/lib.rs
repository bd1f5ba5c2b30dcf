//! treegrab core library
//!
//! Mirrors every file reachable from an HTTP directory listing into a local
//! directory tree.
//!
//! # Architecture
//!
//! - [`crawl`] - listing classification, tree walk, download dispatch, mirror checks
//! - [`download`] - HTTP client and filesystem persistence
//! - [`config`] - validated run settings

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crawl;
pub mod download;
mod user_agent;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawl::{
    CrawlError, CrawlSummary, DEFAULT_THREADS, MAX_THREADS, MIN_THREADS, RunController, RunReport,
    RunStats, RunStatsSnapshot,
};
pub use download::{DownloadError, HttpClient};
