use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins, otherwise `info`.
/// CloudWatch stamps every line itself, so no time or target here.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}
