//! Freshness comparison between a remote `Last-Modified` header and a local
//! file's modification time.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::CrawlError;
use crate::download::storage;

/// The one accepted `Last-Modified` format (RFC 1123 / IMF-fixdate).
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub i64);

impl Epoch {
    /// Converts a filesystem timestamp, including ones before 1970.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(i64::try_from(after.as_secs()).unwrap_or(i64::MAX)),
            Err(before) => Self(-i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

/// Parses a `Last-Modified` header such as `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// # Errors
///
/// Returns [`CrawlError::MalformedTimestamp`] for anything that is not exactly
/// the RFC 1123 form; RFC 850 and asctime dates are rejected too.
pub fn parse_remote_timestamp(header: &str) -> Result<Epoch, CrawlError> {
    NaiveDateTime::parse_from_str(header.trim(), RFC1123_FORMAT)
        .map(|dt| Epoch(dt.and_utc().timestamp()))
        .map_err(|_| CrawlError::MalformedTimestamp {
            value: header.to_string(),
        })
}

/// True only when `remote` is strictly later; equal timestamps are not newer.
#[must_use]
pub fn is_remote_newer(local: Epoch, remote: Epoch) -> bool {
    remote > local
}

/// Per-file outcome of the mirror freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorDecision {
    /// A file already exists at the target path.
    pub local_exists: bool,
    /// Normalised local modification time, when readable.
    pub local_epoch: Option<Epoch>,
    /// Parsed `Last-Modified`, when present and well-formed.
    pub remote_epoch: Option<Epoch>,
    /// Whether the file should be fetched.
    pub should_download: bool,
}

/// Compares remote and local timestamps for mirror mode.
///
/// Local mtimes are shifted by `local_tz_offset_secs` before comparison to
/// correct for servers whose `Last-Modified` is stamped in a different zone
/// than the local clock. The right value depends on the server; `0` is
/// correct for servers that report true GMT.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampComparator {
    local_tz_offset_secs: i64,
}

impl TimestampComparator {
    /// Creates a comparator with the given local offset in seconds.
    #[must_use]
    pub fn new(local_tz_offset_secs: i64) -> Self {
        Self {
            local_tz_offset_secs,
        }
    }

    /// Offset applied to local modification times.
    #[must_use]
    pub fn offset_secs(&self) -> i64 {
        self.local_tz_offset_secs
    }

    /// Normalised modification time of `path`.
    ///
    /// # Errors
    ///
    /// Returns the IO error from reading file metadata.
    pub async fn local_epoch(&self, path: &Path) -> std::io::Result<Epoch> {
        let modified = storage::modification_time(path).await?;
        Ok(self.normalize(modified))
    }

    fn normalize(&self, modified: SystemTime) -> Epoch {
        let Epoch(secs) = Epoch::from_system_time(modified);
        Epoch(secs.saturating_add(self.local_tz_offset_secs))
    }

    /// Decides whether the file at `path` should be re-downloaded.
    ///
    /// Anything that prevents a comparison (no local file, missing or
    /// malformed header, unreadable mtime) results in a download.
    pub async fn decide(&self, path: &Path, last_modified: Option<&str>) -> MirrorDecision {
        if !storage::file_exists(path).await {
            return MirrorDecision {
                local_exists: false,
                local_epoch: None,
                remote_epoch: None,
                should_download: true,
            };
        }

        let remote_epoch = match last_modified.map(parse_remote_timestamp) {
            Some(Ok(epoch)) => Some(epoch),
            Some(Err(e)) => {
                warn!(path = %path.display(), error = %e, "cannot determine freshness; downloading");
                None
            }
            None => {
                debug!(path = %path.display(), "no Last-Modified header; downloading");
                None
            }
        };

        let local_epoch = match self.local_epoch(path).await {
            Ok(epoch) => Some(epoch),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read local mtime; downloading");
                None
            }
        };

        let should_download = match (local_epoch, remote_epoch) {
            (Some(local), Some(remote)) => is_remote_newer(local, remote),
            _ => true,
        };

        MirrorDecision {
            local_exists: true,
            local_epoch,
            remote_epoch,
            should_download,
        }
    }
}
