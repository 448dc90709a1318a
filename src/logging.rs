use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "waves_ascension=info";

/// Install the global fmt subscriber writing to stderr. Invalid filter
/// directives fall back to [DEFAULT_LOG_FILTER]; a second call is a no-op.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
