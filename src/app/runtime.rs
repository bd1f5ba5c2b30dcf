//! Top-level flow of the treegrab binary.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use treegrab_core::{CrawlConfig, CrawlError, RunController};

use crate::app::exit_handler::{self, ProcessExit};
use crate::app::{progress_manager, prompt, summary, terminal};
use crate::cli::Args;

pub(crate) async fn run_treegrab() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    terminal::init_tracing(terminal::resolve_default_log_level(&args));
    debug!(?args, "CLI arguments parsed");

    let output_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut config = CrawlConfig::new(args.url.clone(), output_dir);
    config.threads = usize::from(args.threads);
    config.mirror = args.mirror;
    config.local_tz_offset_secs = args.tz_offset;
    config.request_timeout = args.timeout.map(Duration::from_secs);

    let cancel = CancellationToken::new();
    let controller = RunController::new(&config, cancel.clone())
        .context("invalid crawl configuration")?;

    if let Err(e) = controller.preflight().await {
        error!(error = %e, "root listing unreachable");
        eprintln!("[x] {e}\n[x] Please check the URL and try again");
        return Ok(ProcessExit::Failure);
    }

    if args.output.is_none() && !args.yes {
        let proceed = prompt::confirm_use_cwd(&config.output_dir, io::stdin().lock(), io::stderr())
            .context("failed to read confirmation")?;
        if !proceed {
            eprintln!("[!] Use --output to choose an output directory");
            return Ok(ProcessExit::Failure);
        }
    }

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; stopping");
            interrupt.cancel();
        }
    });

    let use_spinner = terminal::should_use_spinner(
        io::stderr().is_terminal(),
        args.quiet,
        args.verbose > 0 || args.debug,
        terminal::is_dumb_terminal(),
    );
    let (progress_handle, progress_stop) =
        progress_manager::spawn_progress_ui(use_spinner, controller.stats());

    info!(url = %config.root, output_dir = %config.output_dir.display(), "starting parse and download");
    let result = controller.run().await;

    progress_manager::stop_progress_ui(progress_handle, &progress_stop).await;

    let report = match result {
        Ok(report) => report,
        Err(e @ CrawlError::UnreachableRoot { .. }) => {
            eprintln!("[x] {e}");
            return Ok(ProcessExit::Failure);
        }
        Err(e) => return Err(e).context("crawl failed"),
    };

    if !args.quiet {
        summary::print_summary(&report);
    }

    Ok(exit_handler::exit_for_report(&report))
}
