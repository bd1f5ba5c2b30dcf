//! HTTP transport and local persistence for the crawler.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Configurable connect and whole-request timeouts
//! - Structured error types with full context
//! - Not-found responses surfaced distinctly for directory probing
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use treegrab_core::download::{HttpClient, storage};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = Url::parse("https://mirror.example.org/pub/readme.txt")?;
//! let target = Path::new("./mirror/pub/readme.txt");
//! storage::ensure_parent_dir(target).await?;
//! let bytes = storage::write_stream(target, client.get(&url).await?).await?;
//! println!("wrote {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
pub mod storage;

pub use client::{HttpClient, last_modified};
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS};
pub use error::DownloadError;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
