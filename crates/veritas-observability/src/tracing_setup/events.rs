//! Structured log events for key decision steps.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a fired rule.
pub fn rule_fired(analysis_id: &str, code: &str, severity: &str, contribution: f64) {
    tracing::debug!(
        event = "rule_fired",
        analysis_id = %analysis_id,
        code = %code,
        severity = %severity,
        contribution = contribution,
        "rule fired"
    );
}

/// Log a rule skipped by the document-profile gate.
pub fn gate_skipped(analysis_id: &str, rule: &str, reason: &str) {
    tracing::debug!(
        event = "gate_skipped",
        analysis_id = %analysis_id,
        rule = %rule,
        reason = %reason,
        "rule skipped by document gate"
    );
}

/// Log an engine that ran out of time.
pub fn engine_timed_out(engine: &str, timeout_ms: u64, critical: bool) {
    tracing::warn!(
        event = "engine_timed_out",
        engine = %engine,
        timeout_ms = timeout_ms,
        critical = critical,
        "engine timed out"
    );
}

/// Log an engine that failed or returned nothing usable.
pub fn engine_unavailable(engine: &str, reason: &str, critical: bool) {
    tracing::warn!(
        event = "engine_unavailable",
        engine = %engine,
        reason = %reason,
        critical = critical,
        "engine unavailable"
    );
}

/// Log the final decision of an analysis.
pub fn decision_reached(analysis_id: &str, label: &str, path: &str, confidence: f64, rule_score: f64) {
    tracing::info!(
        event = "decision_reached",
        analysis_id = %analysis_id,
        label = %label,
        path = %path,
        confidence = confidence,
        rule_score = rule_score,
        "decision reached"
    );
}
