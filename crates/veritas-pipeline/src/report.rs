use serde::{Deserialize, Serialize};
use veritas_core::audit::{AuditEvent, ReconciliationEvent};
use veritas_core::errors::VeritasResult;
use veritas_core::models::{
    Decision, DecisionPath, DocProfile, EngineVerdict, FinalLabel, GeoDiagnostics, GeoProfile,
    RecommendedAction,
};

/// Caller-facing outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: String,
    pub final_label: FinalLabel,
    pub final_confidence: f64,
    pub recommended_action: RecommendedAction,
    pub decision_path: DecisionPath,
    pub agreement: Option<f64>,
    /// The rule decision the reconciliation started from.
    pub decision: Decision,
    /// One per registered engine, in roster order.
    pub verdicts: Vec<EngineVerdict>,
    pub reconciliation: ReconciliationEvent,
    /// Every audit event of the analysis in sequence order.
    pub events: Vec<AuditEvent>,
    pub doc_profile: DocProfile,
    pub geo_profile: GeoProfile,
    pub geo_diagnostics: GeoDiagnostics,
    pub learned_snapshot_version: u64,
}

impl AnalysisReport {
    pub fn to_json(&self) -> VeritasResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> VeritasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Events carrying `code`.
    pub fn events_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a AuditEvent> + 'a {
        self.events.iter().filter(move |e| e.code == code)
    }
}
