//! Downloads one discovered file and records the outcome.
//!
//! The dispatcher never throttles; the crawler holds a semaphore permit for the
//! lifetime of each call. Errors are folded into [`DownloadOutcome::Failed`]
//! and never escape a task.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use super::stats::RunStats;
use super::task::DownloadTask;
use super::timestamp::TimestampComparator;
use super::CrawlError;
use crate::download::{DownloadError, HttpClient, last_modified, storage};

/// Final state of one download task.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// File written in full.
    Completed {
        /// Local path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// Mirror mode found the local copy current; nothing was written.
    Skipped {
        /// Local path.
        path: PathBuf,
    },
    /// Transport or write failure.
    Failed {
        /// Wrapped [`CrawlError::DownloadFailure`].
        error: CrawlError,
    },
    /// The run was interrupted before anything was written.
    Cancelled {
        /// Remote URL.
        url: Url,
    },
}

/// Fetches files and writes them under the output root.
#[derive(Debug)]
pub struct DownloadDispatcher {
    client: HttpClient,
    output_dir: PathBuf,
    mirror: Option<TimestampComparator>,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
}

impl DownloadDispatcher {
    /// Creates a dispatcher. `mirror` enables freshness checks when set.
    #[must_use]
    pub fn new(
        client: HttpClient,
        output_dir: PathBuf,
        mirror: Option<TimestampComparator>,
        stats: Arc<RunStats>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            output_dir,
            mirror,
            stats,
            cancel,
        }
    }

    /// Counters this dispatcher reports into.
    #[must_use]
    pub fn stats(&self) -> &Arc<RunStats> {
        &self.stats
    }

    /// Downloads `task` and records the outcome in the run stats.
    #[instrument(skip(self, task), fields(url = %task.source))]
    pub async fn dispatch(&self, task: DownloadTask) -> DownloadOutcome {
        self.stats.enter_flight(&task.relative_path);
        let outcome = self.execute(&task).await;
        self.stats.leave_flight(&task.relative_path);

        match &outcome {
            DownloadOutcome::Completed { path, bytes } => {
                debug!(path = %path.display(), bytes, "download completed");
                self.stats.increment_completed();
            }
            DownloadOutcome::Skipped { path } => {
                debug!(path = %path.display(), "local copy is current; skipped");
                self.stats.increment_skipped();
            }
            DownloadOutcome::Failed { error } => {
                warn!(error = %error, "download failed");
                self.stats.increment_failed();
            }
            DownloadOutcome::Cancelled { .. } => {
                debug!("download cancelled before write");
                self.stats.increment_cancelled();
            }
        }

        outcome
    }

    async fn execute(&self, task: &DownloadTask) -> DownloadOutcome {
        if self.cancel.is_cancelled() {
            return DownloadOutcome::Cancelled {
                url: task.source.clone(),
            };
        }

        let path = self.output_dir.join(&task.relative_path);
        match self.fetch_to(task, path).await {
            Ok(outcome) => outcome,
            Err(error) => DownloadOutcome::Failed { error },
        }
    }

    async fn fetch_to(
        &self,
        task: &DownloadTask,
        path: PathBuf,
    ) -> Result<DownloadOutcome, CrawlError> {
        let failure = |source: DownloadError| CrawlError::DownloadFailure {
            url: task.source.to_string(),
            source,
        };

        storage::ensure_parent_dir(&path).await.map_err(failure)?;
        let response = self.client.get(&task.source).await.map_err(failure)?;

        if let Some(comparator) = &self.mirror {
            let decision = comparator.decide(&path, last_modified(&response)).await;
            debug!(?decision, "mirror decision");
            if !decision.should_download {
                return Ok(DownloadOutcome::Skipped { path });
            }
        }

        if self.cancel.is_cancelled() {
            return Ok(DownloadOutcome::Cancelled {
                url: task.source.clone(),
            });
        }

        let bytes = storage::write_stream(&path, response)
            .await
            .map_err(failure)?;
        Ok(DownloadOutcome::Completed { path, bytes })
    }
}
