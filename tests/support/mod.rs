//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Skips the calling test when no localhost socket can be bound.
macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = support::socket_guard::start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

/// Renders an IIS-style listing page with one anchor per entry.
pub fn listing_html(entries: &[&str]) -> String {
    let links: String = entries
        .iter()
        .map(|entry| format!("<a href=\"{entry}\">{entry}</a><br>\n"))
        .collect();
    format!("<html><head><title>Index</title></head><body><pre>{links}</pre></body></html>")
}

/// Serves a listing page at `route`.
pub async fn mount_listing(server: &MockServer, route: &str, entries: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(listing_html(entries)),
        )
        .mount(server)
        .await;
}

/// Serves a file body at `route`.
pub async fn mount_file(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Serves a file body with a `Last-Modified` header.
pub async fn mount_file_with_last_modified(
    server: &MockServer,
    route: &str,
    body: &[u8],
    last_modified: &str,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Last-Modified", last_modified)
                .set_body_bytes(body.to_vec()),
        )
        .mount(server)
        .await;
}

/// Sets the modification time of `path` to `epoch_secs`.
pub fn set_mtime(path: &Path, epoch_secs: u64) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open file for mtime update");
    file.set_modified(UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .expect("set mtime");
}

/// Reads the modification time of `path` as seconds since the epoch.
pub fn mtime_secs(path: &Path) -> u64 {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|time: SystemTime| time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()))
        .expect("read mtime")
}
