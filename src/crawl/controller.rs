//! Top-level run: crawl, drain, report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::CrawlError;
use super::classifier::{DirectoryProbe, as_directory_url};
use super::crawler::{CrawlSummary, TreeCrawler};
use super::dispatcher::DownloadDispatcher;
use super::stats::{RunStats, RunStatsSnapshot};
use super::timestamp::TimestampComparator;
use crate::config::CrawlConfig;
use crate::download::HttpClient;

/// What a finished (or interrupted) run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Download counters after the drain.
    pub stats: RunStatsSnapshot,
    /// Discovery counters.
    pub crawl: CrawlSummary,
    /// True if the drain stopped early on cancellation.
    pub interrupted: bool,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Owns the thread cap, the run stats, and the cancellation token.
///
/// # Example
///
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use treegrab_core::{CrawlConfig, RunController};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new(Url::parse("https://mirror.example.org/pub/")?, "./mirror");
/// let controller = RunController::new(&config, CancellationToken::new())?;
/// let report = controller.run().await?;
/// println!("completed {}, failed {}", report.stats.completed, report.stats.failed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RunController {
    config: CrawlConfig,
    client: HttpClient,
    crawler: TreeCrawler,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
}

impl RunController {
    /// Wires a dispatcher and crawler for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidConcurrency`] if the thread count is out
    /// of range.
    #[instrument(level = "debug", skip(config, cancel), fields(root = %config.root))]
    pub fn new(config: &CrawlConfig, cancel: CancellationToken) -> Result<Self, CrawlError> {
        config.validate()?;

        let client = config.build_client();
        let stats = Arc::new(RunStats::new());
        let mirror = config
            .mirror
            .then(|| TimestampComparator::new(config.local_tz_offset_secs));
        let dispatcher = Arc::new(DownloadDispatcher::new(
            client.clone(),
            config.output_dir.clone(),
            mirror,
            Arc::clone(&stats),
            cancel.clone(),
        ));
        let crawler = TreeCrawler::new(client.clone(), dispatcher, config.threads, cancel.clone());

        Ok(Self {
            config: config.clone(),
            client,
            crawler,
            stats,
            cancel,
        })
    }

    /// Replaces the directory probe used by the crawler.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn DirectoryProbe>) -> Self {
        self.crawler = self.crawler.with_probe(probe);
        self
    }

    /// Live counters, for progress display.
    #[must_use]
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Confirms the root listing is reachable before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::UnreachableRoot`] on any fetch failure.
    pub async fn preflight(&self) -> Result<(), CrawlError> {
        let root = as_directory_url(&self.config.root);
        self.client
            .fetch_listing(&root)
            .await
            .map(|_| ())
            .map_err(|source| CrawlError::UnreachableRoot {
                url: root.to_string(),
                source,
            })
    }

    /// Crawls the whole tree and waits for every download to finish.
    ///
    /// Cancellation stops the wait at once; downloads still running are
    /// detached rather than aborted, and the report is marked interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::UnreachableRoot`] if the root listing cannot be
    /// fetched.
    #[instrument(skip(self), fields(root = %self.config.root, output_dir = %self.config.output_dir.display()))]
    pub async fn run(&self) -> Result<RunReport, CrawlError> {
        let started = Instant::now();
        let mut tasks = JoinSet::new();

        info!(threads = self.config.threads, mirror = self.config.mirror, "starting crawl");
        let crawl = self.crawler.crawl(&self.config.root, &mut tasks).await?;

        info!(
            in_flight = tasks.len(),
            "all downloads dispatched; waiting for them to finish"
        );
        debug!(active = ?self.stats.active_downloads(), "active downloads");

        let mut interrupted = self.cancel.is_cancelled();
        while !interrupted {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => interrupted = true,
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok(())) => {
                        if !tasks.is_empty() {
                            debug!(
                                remaining = tasks.len(),
                                active = ?self.stats.active_downloads(),
                                "still downloading"
                            );
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "download task panicked");
                        self.stats.increment_failed();
                    }
                },
            }
        }

        if interrupted {
            warn!(
                still_running = tasks.len(),
                active = ?self.stats.active_downloads(),
                "interrupted; in-flight downloads left to finish on their own"
            );
            tasks.detach_all();
        }

        let stats = self.stats.snapshot();
        info!(
            completed = stats.completed,
            skipped = stats.skipped,
            failed = stats.failed,
            cancelled = stats.cancelled,
            interrupted,
            "run finished"
        );

        Ok(RunReport {
            stats,
            crawl,
            interrupted,
            elapsed: started.elapsed(),
        })
    }
}
