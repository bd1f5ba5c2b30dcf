//! Exit code logic for the treegrab process.
//!
//! Single responsibility: map a run report to the process exit outcome.

use std::process::ExitCode;

use treegrab_core::RunReport;

/// Process exit outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Everything dispatched completed or was skipped as current.
    Success,
    /// Fatal error, declined prompt, or every download failed.
    Failure,
    /// Some downloads failed, some completed.
    Partial,
    /// Stopped by Ctrl-C.
    Interrupted,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Partial => ExitCode::from(2),
            ProcessExit::Interrupted => ExitCode::from(130),
        }
    }
}

/// Determines the process exit outcome from completed and failed download counts.
pub(crate) fn determine_exit_outcome(completed: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

pub(crate) fn exit_for_report(report: &RunReport) -> ProcessExit {
    if report.interrupted {
        return ProcessExit::Interrupted;
    }
    determine_exit_outcome(
        report.stats.completed + report.stats.skipped,
        report.stats.failed,
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use treegrab_core::{CrawlSummary, RunStatsSnapshot};

    use super::*;

    fn report(completed: usize, skipped: usize, failed: usize, interrupted: bool) -> RunReport {
        RunReport {
            stats: RunStatsSnapshot {
                dispatched: completed + skipped + failed,
                completed,
                skipped,
                failed,
                ..RunStatsSnapshot::default()
            },
            crawl: CrawlSummary::default(),
            interrupted,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_exit_outcome_success_when_no_failures() {
        assert_eq!(determine_exit_outcome(3, 0), ProcessExit::Success);
        assert_eq!(determine_exit_outcome(0, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_mixed() {
        assert_eq!(determine_exit_outcome(2, 1), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_failure_when_all_failed() {
        assert_eq!(determine_exit_outcome(0, 2), ProcessExit::Failure);
    }

    #[test]
    fn test_skips_count_toward_success() {
        assert_eq!(exit_for_report(&report(0, 4, 1, false)), ProcessExit::Partial);
        assert_eq!(exit_for_report(&report(0, 4, 0, false)), ProcessExit::Success);
    }

    #[test]
    fn test_interrupted_wins() {
        assert_eq!(exit_for_report(&report(5, 0, 0, true)), ProcessExit::Interrupted);
    }
}
