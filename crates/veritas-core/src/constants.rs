/// Veritas system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire name of the unknown country.
pub const UNKNOWN_COUNTRY: &str = "UNKNOWN";

/// Prefix for rule outcome codes produced by learned rules.
pub const LEARNED_CODE_PREFIX: &str = "LEARNED_";

/// Environment variable read by the tracing filter.
pub const LOG_ENV_VAR: &str = "VERITAS_LOG";
