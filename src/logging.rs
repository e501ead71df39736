use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BUILD_DESCRIPTOR_LOG";

/// Install the stderr subscriber; stdout stays reserved for emitted output.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
