//! End-of-run report printed to stdout.

use treegrab_core::RunReport;

pub(crate) fn render_summary(report: &RunReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    if report.interrupted {
        out.push_str("[!] Interrupted: partial results below; some downloads may still have been running\n");
    } else {
        out.push_str("[+] All downloads have finished\n");
    }

    out.push_str(&format!(
        "    completed: {}  skipped: {}  failed: {}  cancelled: {}\n",
        stats.completed, stats.skipped, stats.failed, stats.cancelled
    ));
    out.push_str(&format!(
        "    listings: {}  branches abandoned: {}  elapsed: {:.1}s",
        report.crawl.listings_fetched,
        report.crawl.branches_failed,
        report.elapsed.as_secs_f64()
    ));
    out
}

pub(crate) fn print_summary(report: &RunReport) {
    println!("{}", render_summary(report));
}
