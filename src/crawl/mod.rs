//! Crawl and dispatch engine.
//!
//! - [`classifier`] turns a listing page into file and directory entries
//! - [`crawler`] walks the tree depth-first and spawns downloads
//! - [`dispatcher`] downloads one file, honouring mirror mode
//! - [`timestamp`] decides freshness in mirror mode
//! - [`controller`] runs a crawl to completion and reports

pub mod classifier;
mod controller;
mod crawler;
mod dispatcher;
mod error;
mod stats;
mod task;
pub mod timestamp;

pub use classifier::{Classified, DirectoryProbe, ProbeOutcome, classify};
pub use controller::{RunController, RunReport};
pub use crawler::{CrawlSummary, TreeCrawler};
pub use dispatcher::{DownloadDispatcher, DownloadOutcome};
pub use error::CrawlError;
pub use stats::{RunStats, RunStatsSnapshot};
pub use task::{CrawlPath, DownloadTask, NodeKind, RemoteNode};
pub use timestamp::{Epoch, MirrorDecision, TimestampComparator};

/// Minimum allowed thread count.
pub const MIN_THREADS: usize = 1;

/// Maximum allowed thread count.
pub const MAX_THREADS: usize = 100;

/// Default number of concurrent downloads.
pub const DEFAULT_THREADS: usize = 15;
