use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the stderr `tracing` subscriber for the binary.
///
/// `RUST_LOG` wins when set; otherwise library events are shown at `warn`,
/// or at `debug` with `--verbose`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        "recent_rhythms=debug,info"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
