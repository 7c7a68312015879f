//! Logging bootstrap
//!
//! Thin wrapper over tracing-subscriber with env-filter support.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system
///
/// `RUST_LOG` wins when set; otherwise the given default directives apply.
pub fn init_logging(default_directives: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directives)),
        )
        .init();
}
