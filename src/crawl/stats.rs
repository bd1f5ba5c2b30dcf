//! Run-wide counters shared by the crawler and every download task.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Counters for one crawl run.
///
/// Each counter is updated by a single atomic operation. The set of active
/// paths sits behind a mutex that is held only for an insert, a remove, or a
/// copy; never across I/O. Read [`snapshot`](Self::snapshot) once the run has
/// drained for a consistent total.
#[derive(Debug, Default)]
pub struct RunStats {
    dispatched: AtomicUsize,
    completed: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    cancelled: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    active: Mutex<BTreeSet<PathBuf>>,
}

/// Plain copy of [`RunStats`] for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatsSnapshot {
    /// Download tasks handed to the dispatcher.
    pub dispatched: usize,
    /// Files written.
    pub completed: usize,
    /// Files left alone because the local copy was current.
    pub skipped: usize,
    /// Files that failed to download or write.
    pub failed: usize,
    /// Tasks that observed cancellation before writing.
    pub cancelled: usize,
    /// Highest number of simultaneously running downloads.
    pub peak_in_flight: usize,
}

impl RunStatsSnapshot {
    /// Tasks that reached a final outcome.
    #[must_use]
    pub fn finished(&self) -> usize {
        self.completed + self.skipped + self.failed + self.cancelled
    }
}

impl RunStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of dispatched downloads.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Returns the number of successfully completed downloads.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of mirror-mode skips.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of downloads currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Relative paths of the downloads currently running, in sorted order.
    #[must_use]
    pub fn active_downloads(&self) -> Vec<PathBuf> {
        self.active_set().iter().cloned().collect()
    }

    /// Copies every counter.
    #[must_use]
    pub fn snapshot(&self) -> RunStatsSnapshot {
        RunStatsSnapshot {
            dispatched: self.dispatched(),
            completed: self.completed(),
            skipped: self.skipped(),
            failed: self.failed(),
            cancelled: self.cancelled.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
        }
    }

    pub(crate) fn increment_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks the download of `path` as started and updates the high-water mark.
    pub(crate) fn enter_flight(&self, path: &Path) {
        self.active_set().insert(path.to_path_buf());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn leave_flight(&self, path: &Path) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.active_set().remove(path);
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn active_set(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
