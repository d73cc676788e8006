//! Tracing setup for the CLI.
//!
//! All log lines go to stderr so stdout stays clean for robot-mode JSON and
//! rendered output. Robot mode emits JSON log lines; interactive terminals
//! get the default pretty format; pipes and redirects get compact plain text.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Map the `--quiet`/`-v` flags to a filter directive.
fn directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "stickmap=error",
        (false, 0) => "stickmap=info",
        (false, 1) => "stickmap=debug",
        (false, _) => "stickmap=trace",
    }
}

/// Install the global subscriber. Call once, before dispatching a command.
///
/// `RUST_LOG` overrides the flag-derived filter when set (e.g.
/// `RUST_LOG=stickmap=debug,rusqlite=warn`).
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, quiet)));

    let base = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);

    if robot_mode {
        tracing_subscriber::registry()
            .with(filter)
            .with(base.json().with_target(true))
            .init();
    } else if io::stderr().is_terminal() {
        tracing_subscriber::registry()
            .with(filter)
            .with(base.with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(base.with_target(false).with_ansi(false).compact())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so unit
    // tests stop at the filter; the CLI tests observe actual log output.

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(directive(0, true), "stickmap=error");
        assert_eq!(directive(3, true), "stickmap=error");
        assert_eq!(directive(0, false), "stickmap=info");
        assert_eq!(directive(1, false), "stickmap=debug");
        assert_eq!(directive(2, false), "stickmap=trace");
    }

    #[test]
    fn test_directives_parse_as_filters() {
        for verbose in 0..=2 {
            for quiet in [false, true] {
                assert!(EnvFilter::try_new(directive(verbose, quiet)).is_ok());
            }
        }
        assert!(EnvFilter::try_new("stickmap=debug,rusqlite=warn").is_ok());
    }
}
