//! Value types that flow between the classifier, crawler, and dispatcher.

use std::path::PathBuf;

use url::Url;

/// What a listing entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A downloadable file.
    File,
    /// A subdirectory to descend into.
    Directory,
    /// Not yet classified.
    Unknown,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    /// Absolute URL; directories end in `/`.
    pub url: Url,
    /// Anchor text with surrounding whitespace and any trailing `/` removed.
    pub name: String,
    /// Classification result.
    pub kind: NodeKind,
}

/// Local-relative directory path accumulated while descending.
///
/// Never mutated in place; [`child`](Self::child) returns an extended copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlPath {
    segments: Vec<String>,
}

impl CrawlPath {
    /// The path of the crawl root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by one directory.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Directory names from the root down.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Joins the segments and `file_name` with host-native separators.
    #[must_use]
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        let mut path: PathBuf = self.segments.iter().collect();
        path.push(file_name);
        path
    }
}

/// A single file to fetch, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Remote file URL.
    pub source: Url,
    /// Destination relative to the output root.
    pub relative_path: PathBuf,
}

impl DownloadTask {
    /// Builds the task for a file node found under `path`.
    #[must_use]
    pub fn for_node(node: &RemoteNode, path: &CrawlPath) -> Self {
        Self {
            source: node.url.clone(),
            relative_path: path.file_path(&node.name),
        }
    }
}
