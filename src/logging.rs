use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,heart_nn=info";

/// Installs the global `tracing` subscriber. Diagnostics go to stderr so that
/// stdout carries only the training report.
///
/// `RUST_LOG` overrides the default filter. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
