//! Tracing setup: structured logging with span definitions and event helpers.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use veritas_core::config::ObservabilityConfig;
use veritas_core::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the subscriber with JSON output at `info`.
///
/// Respects `VERITAS_LOG`, e.g. `VERITAS_LOG=veritas_rules=debug,info`.
pub fn init_tracing() {
    init_with_config(&ObservabilityConfig::default());
}

/// Initialize the subscriber from configuration.
///
/// `VERITAS_LOG` overrides `log_level` when set and valid. Idempotent; if a
/// global subscriber is already installed by the host this is a no-op.
pub fn init_with_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        let installed = if config.json {
            builder.json().with_current_span(true).try_init()
        } else {
            builder.try_init()
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already installed; keeping it");
        }
    });
}

/// Filter directive used when `VERITAS_LOG` is absent.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    let level = config.log_level.trim().to_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => level,
        _ => "info".to_string(),
    }
}
