//! Filesystem side of a download: directory creation, existence checks,
//! modification times, and streaming a response body to disk.

use std::path::Path;
use std::time::SystemTime;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::client::map_transport_error;
use super::error::DownloadError;

/// Creates every missing ancestor of `path`.
///
/// Idempotent and safe to call from many tasks for the same directory.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if a directory cannot be created.
pub async fn ensure_parent_dir(path: &Path) -> Result<(), DownloadError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| DownloadError::io(parent, e))
}

/// Returns true if a regular file exists at `path`.
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Reads the filesystem modification time of `path`.
///
/// # Errors
///
/// Returns the underlying IO error if metadata is unavailable or the platform
/// does not record modification times.
pub async fn modification_time(path: &Path) -> std::io::Result<SystemTime> {
    tokio::fs::metadata(path).await?.modified()
}

/// Streams a response body to `path`, truncating any existing file.
///
/// A failure mid-stream leaves whatever was written so far; callers report the
/// error rather than cleaning up.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] on create/write failures and
/// [`DownloadError::Network`] if the body stream breaks.
pub async fn write_stream(path: &Path, response: reqwest::Response) -> Result<u64, DownloadError> {
    let url = response.url().clone();
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| map_transport_error(&url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    debug!(path = %path.display(), bytes = bytes_written, "file written");
    Ok(bytes_written)
}
