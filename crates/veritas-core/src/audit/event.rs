use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Component that appended an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSource {
    Pipeline,
    RuleEngine,
    GeoMatrix,
    DocumentGate,
    LearnedRules,
    Normalizer,
    Orchestrator,
    Reconciler,
}

/// What kind of fact an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCategory {
    RuleFired,
    RuleFault,
    Gating,
    Geo,
    Learned,
    Engine,
    Normalization,
    Reconciliation,
    Consistency,
}

/// One entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// `{analysis_id}:{seq}`; stable across repeat evaluations.
    pub id: String,
    pub seq: u32,
    pub timestamp: DateTime<Utc>,
    pub source: AuditSource,
    pub category: AuditCategory,
    pub severity: Severity,
    /// Stable machine-readable code, e.g. "GATE_FIELD_NOT_EXPECTED".
    pub code: String,
    pub message: String,
    pub evidence: serde_json::Value,
}
