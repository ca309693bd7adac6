//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter defaults to `default_level` for this crate (plus
/// `tower_http`), and can be overridden with the `RUST_LOG`
/// environment variable.
pub fn setup_logger(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "chat_rooms_rs={default_level},server={default_level},tower_http={default_level}"
        ))
    });

    // try_init so test binaries can call this more than once
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .try_init();
}
