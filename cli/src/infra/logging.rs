//! Diagnostic logging on stderr.
//!
//! User-facing progress goes through `ProgressReporter`; this layer carries
//! request and response detail for debugging.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. `RUST_LOG` wins; otherwise the level is
/// `debug` with `--verbose` and `warn` without.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}
