//! Splits a directory listing into file and subdirectory entries.
//!
//! Names without an extension are directories. Names with an extension are
//! ambiguous (`archive.old` may be a directory, `archive.tar` a file) and are
//! settled with a directory probe: fetch `name/` and see whether the server
//! accepts it.

use std::collections::HashSet;
use std::path::{Component, Path};

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, trace, warn};
use url::Url;

use super::CrawlError;
use super::task::{NodeKind, RemoteNode};
use crate::download::HttpClient;

/// Anchor texts that point back up the tree.
pub const PARENT_MARKERS: &[&str] = &["[To Parent Directory]", "Parent Directory", "..", "../"];

/// Suffix Apache's fancy index puts on names cut to fit the column width.
const TRUNCATED_SUFFIX: &str = "..>";

/// Result of probing `name/` on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The trailing-slash URL answered with success.
    Directory,
    /// The server answered 404.
    NotFound,
    /// Any other failure.
    Inconclusive,
}

/// Existence check for a directory URL.
#[async_trait]
pub trait DirectoryProbe: Send + Sync {
    /// Probes `url`, which always ends in `/`.
    async fn probe(&self, url: &Url) -> ProbeOutcome;
}

#[async_trait]
impl DirectoryProbe for HttpClient {
    async fn probe(&self, url: &Url) -> ProbeOutcome {
        match self.get(url).await {
            Ok(_) => ProbeOutcome::Directory,
            Err(e) if e.is_not_found() => ProbeOutcome::NotFound,
            Err(e) => {
                debug!(url = %url, error = %e, "directory probe inconclusive");
                ProbeOutcome::Inconclusive
            }
        }
    }
}

/// Entries of one listing, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Entries to download.
    pub files: Vec<RemoteNode>,
    /// Entries to descend into.
    pub dirs: Vec<RemoteNode>,
}

/// An anchor that survived filtering, before classification.
struct ListingEntry {
    name: String,
    explicit_dir: bool,
    /// Resolved `href`, used instead of the name when the text was truncated.
    target: Option<Url>,
}

/// Returns `url` with a trailing slash on its path.
#[must_use]
pub fn as_directory_url(url: &Url) -> Url {
    if url.path().ends_with('/') {
        return url.clone();
    }
    let mut dir = url.clone();
    let path = format!("{}/", url.path());
    dir.set_path(&path);
    dir
}

/// True if `name` is usable as exactly one local path component.
///
/// Rejects separators of either platform, `.`, `..`, and anything absolute or
/// prefixed, so a listing can never place a file outside the output tree.
#[must_use]
pub fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// True if the name has a dot after its leading dots (`name.` counts; `.profile` does not).
#[must_use]
pub fn has_extension(name: &str) -> bool {
    name.trim_start_matches('.').contains('.')
}

/// Classifies every entry of `html`, a listing served at `base`.
///
/// # Errors
///
/// Returns [`CrawlError::EmptyListing`] if any non-navigation anchor has no
/// visible text.
pub async fn classify(
    html: &str,
    base: &Url,
    probe: &dyn DirectoryProbe,
) -> Result<Classified, CrawlError> {
    let base = as_directory_url(base);
    let entries = extract_entries(html, &base)?;
    let mut classified = Classified::default();

    for entry in entries {
        let file_url = match &entry.target {
            Some(target) => without_trailing_slash(target),
            None => match base.join(&urlencoding::encode(&entry.name)) {
                Ok(url) => url,
                Err(e) => {
                    debug!(name = %entry.name, error = %e, "cannot build entry URL; skipping");
                    continue;
                }
            },
        };
        let dir_url = as_directory_url(&file_url);

        let kind = if entry.explicit_dir || !has_extension(&entry.name) {
            NodeKind::Directory
        } else {
            match probe.probe(&dir_url).await {
                ProbeOutcome::Directory => NodeKind::Directory,
                ProbeOutcome::NotFound | ProbeOutcome::Inconclusive => NodeKind::File,
            }
        };
        trace!(name = %entry.name, ?kind, "classified entry");

        match kind {
            NodeKind::Directory => classified.dirs.push(RemoteNode {
                url: dir_url,
                name: entry.name,
                kind,
            }),
            NodeKind::File | NodeKind::Unknown => classified.files.push(RemoteNode {
                url: file_url,
                name: entry.name,
                kind: NodeKind::File,
            }),
        }
    }

    Ok(classified)
}

/// Pulls candidate entries out of the page. Kept synchronous so the parsed
/// document never lives across an await point.
fn extract_entries(html: &str, base: &Url) -> Result<Vec<ListingEntry>, CrawlError> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for element in document.select(&anchor) {
        let href = element.value().attr("href").unwrap_or_default();
        if href.starts_with('?') || href.starts_with('#') {
            continue;
        }

        let text: String = element.text().collect();
        let text = text.trim();
        if PARENT_MARKERS.contains(&text) {
            trace!("skipping parent directory link");
            continue;
        }
        if text.is_empty() {
            return Err(CrawlError::EmptyListing {
                url: base.to_string(),
            });
        }

        let entry = if text.ends_with(TRUNCATED_SUFFIX) {
            let Some(entry) = truncated_entry(base, href) else {
                warn!(text, href, "truncated name without a usable link; skipping");
                continue;
            };
            entry
        } else {
            ListingEntry {
                name: text.trim_end_matches('/').to_string(),
                explicit_dir: text.ends_with('/'),
                target: None,
            }
        };

        if !is_safe_name(&entry.name) {
            warn!(name = %entry.name, url = %base, "entry name is not a plain file name; skipping");
            continue;
        }
        if !seen.insert(entry.name.clone()) {
            continue;
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Recovers the full name of a truncated entry from its link, which must
/// point at a direct child of `base`.
fn truncated_entry(base: &Url, href: &str) -> Option<ListingEntry> {
    let mut target = base.join(href).ok()?;
    target.set_query(None);
    target.set_fragment(None);
    if target.origin() != base.origin() {
        return None;
    }

    let rest = target.path().strip_prefix(base.path())?;
    let explicit_dir = rest.ends_with('/');
    let segment = rest.strip_suffix('/').unwrap_or(rest);
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    let name = urlencoding::decode(segment).ok()?.into_owned();

    Some(ListingEntry {
        name,
        explicit_dir,
        target: Some(target),
    })
}

fn without_trailing_slash(url: &Url) -> Url {
    let mut file = url.clone();
    let path = url.path().trim_end_matches('/').to_string();
    file.set_path(&path);
    file
}
