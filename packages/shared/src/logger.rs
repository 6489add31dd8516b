//! Logging setup for FlashChat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default directive enables `default_log_level` for the server library
/// (`flashchat_server`), this crate and the binary itself. It can be overridden
/// with the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use flashchat_shared::logger::setup_logger;
///
/// setup_logger("flashchat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "flashchat_server={level},{shared}={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        shared = env!("CARGO_PKG_NAME").replace('-', "_"),
        bin = binary_name.replace('-', "_"),
    )
}
