//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use treegrab_core::DEFAULT_THREADS;
use treegrab_core::download::MAX_REQUEST_TIMEOUT_SECS;

/// Mirror every file reachable from an HTTP directory listing.
///
/// treegrab walks an open directory index (IIS, Apache, nginx autoindex),
/// downloads each file it finds, and rebuilds the remote tree locally.
#[derive(Parser, Debug)]
#[command(name = "treegrab")]
#[command(author, version, about)]
pub struct Args {
    /// Root URL of the directory listing
    pub url: Url,

    /// Directory to mirror into (defaults to the current directory after confirmation)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub threads: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log everything, including per-entry classification (same as -vv)
    #[arg(long)]
    pub debug: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Only download files whose Last-Modified is newer than the local copy
    #[arg(short, long)]
    pub mirror: bool,

    /// Seconds added to local modification times before mirror comparisons
    #[arg(long, value_name = "SECONDS", default_value_t = 0, allow_negative_numbers = true)]
    pub tz_offset: i64,

    /// Abort any single request that takes longer than this many seconds (1-3600)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..=MAX_REQUEST_TIMEOUT_SECS))]
    pub timeout: Option<u64>,

    /// Use the current directory without asking when --output is omitted
    #[arg(short, long)]
    pub yes: bool,
}
