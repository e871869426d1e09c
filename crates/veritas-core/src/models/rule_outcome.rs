use serde::{Deserialize, Serialize};

use super::Severity;

/// A fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Catalogue id, e.g. "metadata.template_tool".
    pub rule_id: String,
    /// Stable code, e.g. "META_TEMPLATE_TOOL".
    pub code: String,
    pub severity: Severity,
    /// Score contribution, never negative.
    pub contribution: f64,
    pub reason: String,
    pub evidence: serde_json::Value,
}

impl RuleOutcome {
    pub fn new(
        rule_id: impl Into<String>,
        code: impl Into<String>,
        severity: Severity,
        contribution: f64,
        reason: impl Into<String>,
        evidence: serde_json::Value,
    ) -> Self {
        let contribution = if contribution.is_finite() {
            contribution.max(0.0)
        } else {
            0.0
        };
        Self {
            rule_id: rule_id.into(),
            code: code.into(),
            severity,
            contribution,
            reason: reason.into(),
            evidence,
        }
    }
}
