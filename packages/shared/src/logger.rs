//! Logger bootstrap shared by every binary in the workspace.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when it is set. Otherwise the binary's own target and
/// `tower_http` are logged at `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{target}={default_level},venturechat_server={default_level},venturechat_client={default_level},tower_http={default_level}"
        ))
    });

    // try_init: tests and embedders may install the subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
