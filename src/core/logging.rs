//! Logging setup using tracing and tracing-subscriber
//!
//! Log output goes to stderr so quotation output on stdout stays pipeable.
//! `RUST_LOG` takes precedence over the verbosity flags, e.g.
//! `RUST_LOG=bomq=trace bomq quote build ...`.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a given verbosity
fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "bomq=debug",
        (false, true) => "error",
        (false, false) => "warn",
    }
}

/// Initialize the global subscriber for the CLI
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
}

/// Initialize a verbose subscriber that writes through the test harness
#[cfg(test)]
pub(crate) fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("bomq=debug"))
        .with_test_writer()
        .try_init();
}
