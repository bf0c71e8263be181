use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
