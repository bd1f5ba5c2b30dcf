//! Depth-first walk of a remote listing tree.
//!
//! Discovery is sequential: one listing is fetched and classified at a time.
//! Downloads are spawned into a [`JoinSet`] as they are found, each holding a
//! permit from a semaphore sized to the thread cap, so discovery pauses
//! whenever the cap is reached.
//!
//! There is no visited-URL set. A server-side symlink loop will be followed
//! forever.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use super::CrawlError;
use super::classifier::{DirectoryProbe, as_directory_url, classify};
use super::dispatcher::DownloadDispatcher;
use super::task::{CrawlPath, DownloadTask};
use crate::download::HttpClient;

/// Counts gathered while walking the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Listing pages fetched successfully.
    pub listings_fetched: usize,
    /// Branches abandoned after a fetch failure or an unusable listing.
    pub branches_failed: usize,
    /// Download tasks spawned.
    pub files_dispatched: usize,
}

/// One pending listing on the work stack.
#[derive(Debug)]
struct CrawlFrame {
    url: Url,
    path: CrawlPath,
    name: Option<String>,
    parent_name: Option<String>,
}

/// Walks a listing tree and feeds files to a [`DownloadDispatcher`].
pub struct TreeCrawler {
    client: HttpClient,
    probe: Arc<dyn DirectoryProbe>,
    dispatcher: Arc<DownloadDispatcher>,
    limiter: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for TreeCrawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCrawler")
            .field("available_permits", &self.limiter.available_permits())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl TreeCrawler {
    /// Creates a crawler that allows at most `threads` concurrent downloads.
    ///
    /// Directory probes go through `client` unless replaced with
    /// [`with_probe`](Self::with_probe).
    #[must_use]
    pub fn new(
        client: HttpClient,
        dispatcher: Arc<DownloadDispatcher>,
        threads: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            probe: Arc::new(client.clone()),
            client,
            dispatcher,
            limiter: Arc::new(Semaphore::new(threads)),
            cancel,
        }
    }

    /// Replaces the directory probe.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn DirectoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Walks the tree under `root`, spawning one task per file into `tasks`.
    ///
    /// Returns once every listing has been visited (or the run is
    /// cancelled); spawned downloads may still be running.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::UnreachableRoot`] if the root listing cannot be
    /// fetched. Failures below the root only abandon their own branch.
    #[instrument(skip(self, tasks), fields(root = %root))]
    pub async fn crawl(
        &self,
        root: &Url,
        tasks: &mut JoinSet<()>,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut summary = CrawlSummary::default();
        let mut stack = vec![CrawlFrame {
            url: as_directory_url(root),
            path: CrawlPath::root(),
            name: None,
            parent_name: None,
        }];
        let mut at_root = true;

        while let Some(frame) = stack.pop() {
            if self.cancel.is_cancelled() {
                info!(pending = stack.len() + 1, "crawl interrupted; remaining listings not visited");
                break;
            }

            let html = match self.client.fetch_listing(&frame.url).await {
                Ok(html) => html,
                Err(source) if at_root => {
                    return Err(CrawlError::UnreachableRoot {
                        url: frame.url.to_string(),
                        source,
                    });
                }
                Err(source) => {
                    let error = CrawlError::BranchFetchFailure {
                        url: frame.url.to_string(),
                        source,
                    };
                    warn!(error = %error, "abandoning branch");
                    summary.branches_failed += 1;
                    continue;
                }
            };
            at_root = false;
            summary.listings_fetched += 1;

            let classified = match classify(&html, &frame.url, self.probe.as_ref()).await {
                Ok(classified) => classified,
                Err(error) => {
                    warn!(error = %error, "abandoning branch");
                    summary.branches_failed += 1;
                    continue;
                }
            };
            debug!(
                url = %frame.url,
                files = classified.files.len(),
                dirs = classified.dirs.len(),
                "listing classified"
            );

            for node in &classified.files {
                let task = DownloadTask::for_node(node, &frame.path);
                if !self.submit(task, tasks).await {
                    break;
                }
                summary.files_dispatched += 1;
            }

            for dir in classified.dirs.iter().rev() {
                if dir.name.trim().is_empty() {
                    continue;
                }
                if frame.parent_name.as_deref() == Some(dir.name.as_str()) {
                    trace!(name = %dir.name, "skipping link back to parent");
                    continue;
                }
                stack.push(CrawlFrame {
                    url: dir.url.clone(),
                    path: frame.path.child(&dir.name),
                    name: Some(dir.name.clone()),
                    parent_name: frame.name.clone(),
                });
            }
        }

        info!(
            listings = summary.listings_fetched,
            branches_failed = summary.branches_failed,
            files = summary.files_dispatched,
            "discovery finished"
        );
        Ok(summary)
    }

    /// Waits for a free slot, then spawns the download. Returns false if the
    /// run was cancelled while waiting.
    async fn submit(&self, task: DownloadTask, tasks: &mut JoinSet<()>) -> bool {
        if self.limiter.available_permits() == 0 {
            debug!("max download threads reached; waiting for a free slot");
        }

        let permit = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return false,
            permit = Arc::clone(&self.limiter).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("download limiter closed unexpectedly");
                    return false;
                }
            },
        };

        trace!(url = %task.source, path = %task.relative_path.display(), "dispatching download");
        self.dispatcher.stats().increment_dispatched();
        let dispatcher = Arc::clone(&self.dispatcher);
        tasks.spawn(async move {
            // Released when the download finishes, whatever the outcome.
            let _permit = permit;
            dispatcher.dispatch(task).await;
        });
        true
    }
}
