//! Tracing subscriber setup.

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`, INFO by default.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
