//! Logging setup for the runner binary.
//!
//! The library only emits through the `log` facade; binaries pick the backend.

/// Initialise `env_logger` with a default level, still overridable by RUST_LOG.
pub fn init_with_level(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

/// Initialise logging at `info`.
pub fn init() {
    init_with_level("info")
}
