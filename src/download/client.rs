//! HTTP client wrapper for listing pages and file downloads.
//!
//! This module provides the `HttpClient` struct which performs GET requests
//! with connect-timeout configuration and maps failures to [`DownloadError`].

use std::time::Duration;

use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, ClientBuilder, Response};
use tracing::{debug, instrument};
use url::Url;

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client shared by the crawler, the directory probe, and every download.
///
/// Create it once and clone it into tasks; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use treegrab_core::download::HttpClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let listing = client
///     .fetch_listing(&Url::parse("https://mirror.example.org/pub/")?)
///     .await?;
/// println!("{} bytes of listing HTML", listing.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default connect timeout and no overall
    /// request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(CONNECT_TIMEOUT_SECS), None)
    }

    /// Creates a client with explicit timeouts.
    ///
    /// `request_timeout` bounds a whole request including the body; `None`
    /// leaves it to the transport, so a stalled server can hold a download
    /// open indefinitely.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout: Duration, request_timeout: Option<Duration>) -> Self {
        let client = base_client_builder(connect_timeout, request_timeout)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends a GET request and returns the response once headers arrive.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::HttpStatus`] for any non-2xx status,
    /// [`DownloadError::Timeout`] or [`DownloadError::Network`] for transport
    /// failures.
    #[instrument(level = "trace", skip(self), fields(url = %url))]
    pub async fn get(&self, url: &Url) -> Result<Response, DownloadError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "non-success response");
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }

        Ok(response)
    }

    /// Fetches a listing page and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get), plus
    /// [`DownloadError::Network`] if the body cannot be read.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch_listing(&self, url: &Url) -> Result<String, DownloadError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| map_transport_error(url, e))
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Returns the raw `Last-Modified` header value, if present and ASCII.
#[must_use]
pub fn last_modified(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
}

pub(crate) fn map_transport_error(url: &Url, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url.as_str())
    } else {
        DownloadError::network(url.as_str(), error)
    }
}

fn base_client_builder(
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
) -> ClientBuilder {
    let mut builder = Client::builder()
        .connect_timeout(connect_timeout)
        .gzip(true)
        .user_agent(user_agent::default_user_agent());
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_new_builds() {
        let client = HttpClient::new();
        drop(client.inner().clone());
    }

    #[test]
    fn test_http_client_with_request_timeout_builds() {
        let client = HttpClient::with_timeouts(Duration::from_secs(5), Some(Duration::from_secs(60)));
        drop(client);
    }

    #[test]
    fn test_get_unreachable_host_is_network_error() {
        let client = HttpClient::with_timeouts(Duration::from_secs(2), Some(Duration::from_secs(2)));
        // Port 9 (discard) on localhost is almost never listening.
        let url = Url::parse("http://127.0.0.1:9/pub/").unwrap();
        let result = tokio_test::block_on(client.get(&url));
        assert!(
            matches!(
                result,
                Err(DownloadError::Network { .. } | DownloadError::Timeout { .. })
            ),
            "expected transport error, got {result:?}"
        );
    }
}
