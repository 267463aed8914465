//! Subscriber setup for the `eyeload` binary.
//!
//! Libraries only emit `tracing` events; this is the one place a subscriber is
//! installed. `RUST_LOG` always wins over the defaults below.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "warn,eyeload_asc=info,eyeload_app=info";
const VERBOSE_FILTER: &str = "info,eyeload_asc=debug,eyeload_app=debug";

/// Logs to stderr so that stdout carries only the session reports
pub fn init(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter)
        .init();
}
