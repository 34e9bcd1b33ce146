//! Tracing subscriber setup for hosts and tools.

/// Initializes the global tracing subscriber with env-filter support.
///
/// Respects `RUST_LOG`; defaults to `info`. Safe to call more than once -
/// later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
