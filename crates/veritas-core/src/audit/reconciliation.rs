use serde::{Deserialize, Serialize};

use super::AuditEvent;
use crate::models::{DecisionPath, EngineStatus, FinalLabel, Label, VerdictTag};

/// One engine verdict as the reconciler consulted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictInput {
    pub engine: String,
    pub status: EngineStatus,
    pub tag: VerdictTag,
    pub confidence: f64,
    pub critical: bool,
    pub veto_capable: bool,
}

/// Every input the reconciler consulted on its way to a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationInputs {
    pub rule_score: f64,
    pub rule_label: Label,
    pub hard_fail_count: usize,
    pub critical_count: usize,
    pub verdicts: Vec<VerdictInput>,
    /// `None` when no engine verdict was available.
    pub agreement: Option<f64>,
    pub missing_optional: Vec<String>,
}

/// Audit event emitted once per reconciliation, tagged with the branch taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationEvent {
    pub event: AuditEvent,
    pub path: DecisionPath,
    pub inputs: ReconciliationInputs,
    pub final_label: FinalLabel,
    pub final_confidence: f64,
}
