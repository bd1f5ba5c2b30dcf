//! Terminal capabilities and tracing setup.

use crate::cli::Args;

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// Spinner only when stderr is interactive and nobody asked for silence or
/// detailed logs that it would garble.
pub(crate) fn should_use_spinner(
    stderr_is_terminal: bool,
    quiet: bool,
    verbose: bool,
    dumb_terminal: bool,
) -> bool {
    stderr_is_terminal && !quiet && !verbose && !dumb_terminal
}

/// Log level implied by the flags. `RUST_LOG` still takes precedence.
pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        return "error";
    }
    if args.debug {
        return "trace";
    }
    match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

pub(crate) fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!(no_color_env_requested() || is_dumb_terminal()))
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["treegrab", "http://example.com/"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(resolve_default_log_level(&args(&[])), "info");
        assert_eq!(resolve_default_log_level(&args(&["-v"])), "debug");
        assert_eq!(resolve_default_log_level(&args(&["-vv"])), "trace");
        assert_eq!(resolve_default_log_level(&args(&["--debug"])), "trace");
        assert_eq!(resolve_default_log_level(&args(&["-q"])), "error");
    }

    #[test]
    fn test_spinner_requires_interactive_quiet_free_terminal() {
        assert!(should_use_spinner(true, false, false, false));
        assert!(!should_use_spinner(false, false, false, false));
        assert!(!should_use_spinner(true, true, false, false));
        assert!(!should_use_spinner(true, false, true, false));
        assert!(!should_use_spinner(true, false, false, true));
    }
}
