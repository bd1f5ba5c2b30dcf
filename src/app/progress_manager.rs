//! Progress UI (spinner) for a crawl run.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use treegrab_core::RunStats;

/// Spawns the progress UI (spinner) when requested.
/// Returns (handle, stop) so the caller can signal stop and await the handle.
/// When `use_spinner` is false, returns (None, stop) with stop already true.
pub(crate) fn spawn_progress_ui(
    use_spinner: bool,
    stats: Arc<RunStats>,
) -> (Option<tokio::task::JoinHandle<()>>, Arc<AtomicBool>) {
    if !use_spinner {
        return (None, Arc::new(AtomicBool::new(true)));
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handle = spawn_spinner_inner(stats, Arc::clone(&stop));
    (Some(handle), stop)
}

/// Signals the spinner to stop and waits for it. A spinner that panicked is
/// logged and otherwise ignored.
pub(crate) async fn stop_progress_ui(
    handle: Option<tokio::task::JoinHandle<()>>,
    stop: &AtomicBool,
) {
    stop.store(true, Ordering::SeqCst);
    if let Some(handle) = handle {
        if let Err(e) = handle.await {
            debug!(error = %e, "progress spinner task ended abnormally");
        }
    }
}

fn spawn_spinner_inner(stats: Arc<RunStats>, stop: Arc<AtomicBool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        while !stop.load(Ordering::SeqCst) {
            spinner.set_message(progress_message(&stats));
            tokio::time::sleep(Duration::from_millis(120)).await;
        }

        spinner.finish_and_clear();
    })
}

/// Names shown next to the counts before the rest are summarised.
const MAX_ACTIVE_SHOWN: usize = 3;

fn progress_message(stats: &RunStats) -> String {
    let snap = stats.snapshot();
    let counts = format!(
        "[{}/{}] {} downloading, {} failed",
        snap.finished(),
        snap.dispatched,
        stats.in_flight(),
        snap.failed
    );
    match active_list(&stats.active_downloads()) {
        Some(active) => format!("{counts}: {active}"),
        None => counts,
    }
}

fn active_list(active: &[PathBuf]) -> Option<String> {
    if active.is_empty() {
        return None;
    }
    let shown: Vec<String> = active
        .iter()
        .take(MAX_ACTIVE_SHOWN)
        .map(|path| path.display().to_string())
        .collect();
    let mut list = shown.join(", ");
    if active.len() > MAX_ACTIVE_SHOWN {
        list.push_str(&format!(" (+{} more)", active.len() - MAX_ACTIVE_SHOWN));
    }
    Some(list)
}
