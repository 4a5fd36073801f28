//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so stdout carries nothing but log content.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` takes precedence; otherwise `debug` selects between debug and
/// warn level output for this crate.
pub fn init(debug: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "logsince=debug"
    } else {
        "logsince=warn"
    }
}
