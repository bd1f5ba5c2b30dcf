//! Crawl-level error taxonomy.
//!
//! Only [`CrawlError::UnreachableRoot`] and [`CrawlError::InvalidConcurrency`]
//! end a run. Every other variant is logged and confined to one branch or one
//! file.

use thiserror::Error;

use crate::download::DownloadError;

use super::{MAX_THREADS, MIN_THREADS};

/// Errors raised while crawling a listing tree.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The root listing could not be fetched.
    #[error("cannot open root listing {url}: {source}")]
    UnreachableRoot {
        /// Root URL.
        url: String,
        /// Transport failure.
        #[source]
        source: DownloadError,
    },

    /// A subdirectory listing could not be fetched; the branch is abandoned.
    #[error("cannot open listing {url}: {source}")]
    BranchFetchFailure {
        /// Listing URL.
        url: String,
        /// Transport failure.
        #[source]
        source: DownloadError,
    },

    /// A listing contained an anchor with no visible text.
    #[error("listing {url} has an anchor with empty text; not a directory index")]
    EmptyListing {
        /// Listing URL.
        url: String,
    },

    /// A `Last-Modified` header did not match the RFC 1123 format.
    #[error("malformed Last-Modified timestamp: {value:?}")]
    MalformedTimestamp {
        /// Raw header value.
        value: String,
    },

    /// One file could not be downloaded or written.
    #[error("download of {url} failed: {source}")]
    DownloadFailure {
        /// File URL.
        url: String,
        /// Underlying transport or IO failure.
        #[source]
        source: DownloadError,
    },

    /// Configured thread count outside the accepted range.
    #[error("invalid thread count {value}: must be between {MIN_THREADS} and {MAX_THREADS}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },
}

impl CrawlError {
    /// Returns true for errors that must stop the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnreachableRoot { .. } | Self::InvalidConcurrency { .. }
        )
    }
}
