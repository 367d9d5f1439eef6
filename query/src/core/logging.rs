//! Logging setup for embedders and tests
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the host process.

use super::constants::{APP_NAME_LOWER, ENV_LOG};

/// Install a compact fmt subscriber filtered by `WORKPACK_LOG` or `RUST_LOG`
///
/// Safe to call more than once: later calls are no-ops when a global
/// subscriber is already set.
pub fn init_logging() {
    let default_filter = format!("info,{}=info", APP_NAME_LOWER);

    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or(default_filter);

    let result = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .try_init();

    if result.is_err() {
        tracing::trace!("Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!("logging initialized twice without panicking");
    }
}
