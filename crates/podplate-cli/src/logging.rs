//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug`
/// when `--debug` was given.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };

    let filter_layer = if debug {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time()
        .compact();

    // A second init (tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
