//! Span definitions per operation: analysis, rule evaluation, engine call, reconciliation.

/// Create an analysis span.
#[macro_export]
macro_rules! analysis_span {
    ($analysis_id:expr) => {
        tracing::info_span!("veritas.analysis", analysis_id = %$analysis_id)
    };
}

/// Create a rule evaluation span.
#[macro_export]
macro_rules! rule_evaluation_span {
    ($analysis_id:expr, $snapshot_version:expr) => {
        tracing::info_span!(
            "veritas.rule_evaluation",
            analysis_id = %$analysis_id,
            snapshot_version = $snapshot_version
        )
    };
}

/// Create an engine roster span.
#[macro_export]
macro_rules! engines_span {
    ($analysis_id:expr, $engine_count:expr) => {
        tracing::info_span!(
            "veritas.engines",
            analysis_id = %$analysis_id,
            engine_count = $engine_count
        )
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ANALYSIS: &str = "veritas.analysis";
    pub const RULE_EVALUATION: &str = "veritas.rule_evaluation";
    pub const ENGINES: &str = "veritas.engines";
    /// Opened by the orchestrator around each engine call.
    pub const ENGINE_CALL: &str = "veritas.engine_call";
    /// Opened by the reconciler.
    pub const RECONCILE: &str = "veritas.reconcile";
}
