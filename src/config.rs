//! Validated settings for one crawl run.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::crawl::{CrawlError, DEFAULT_THREADS, MAX_THREADS, MIN_THREADS};
use crate::download::{CONNECT_TIMEOUT_SECS, HttpClient};

/// Everything the run controller needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Listing URL the walk starts from.
    pub root: Url,
    /// Local directory the remote tree is rebuilt under.
    pub output_dir: PathBuf,
    /// Maximum concurrent downloads.
    pub threads: usize,
    /// Skip files whose remote copy is not newer than the local one.
    pub mirror: bool,
    /// Seconds added to local mtimes before comparing with `Last-Modified`.
    pub local_tz_offset_secs: i64,
    /// TCP connect timeout. Bounded by default so an unroutable host fails
    /// its branch instead of waiting on the OS connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` leaves it unbounded.
    pub request_timeout: Option<Duration>,
}

impl CrawlConfig {
    /// Defaults for everything but the root and output directory.
    #[must_use]
    pub fn new(root: Url, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root,
            output_dir: output_dir.into(),
            threads: DEFAULT_THREADS,
            mirror: false,
            local_tz_offset_secs: 0,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: None,
        }
    }

    /// Checks values the CLI cannot enforce on its own.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidConcurrency`] if `threads` is outside
    /// `MIN_THREADS..=MAX_THREADS`.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if !(MIN_THREADS..=MAX_THREADS).contains(&self.threads) {
            return Err(CrawlError::InvalidConcurrency {
                value: self.threads,
            });
        }
        Ok(())
    }

    /// Builds the shared HTTP client for this run.
    #[must_use]
    pub fn build_client(&self) -> HttpClient {
        HttpClient::with_timeouts(self.connect_timeout, self.request_timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> CrawlConfig {
        CrawlConfig::new(Url::parse("http://example.com/pub/").unwrap(), "out")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.threads, 15);
        assert!(!config.mirror);
        assert_eq!(config.local_tz_offset_secs, 0);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_thread_bounds() {
        let mut config = config();
        config.threads = 0;
        assert!(matches!(
            config.validate(),
            Err(CrawlError::InvalidConcurrency { value: 0 })
        ));
        config.threads = 101;
        assert!(config.validate().is_err());
        config.threads = 1;
        assert!(config.validate().is_ok());
        config.threads = 100;
        assert!(config.validate().is_ok());
    }
}
