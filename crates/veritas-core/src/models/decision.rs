use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RuleOutcome, Severity};
use crate::audit::AuditEvent;
use crate::config::ThresholdsConfig;

/// Label assigned by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Real,
    Suspicious,
    Fake,
}

impl Label {
    /// Map a clamped score onto a label.
    pub fn from_score(score: f64, thresholds: &ThresholdsConfig) -> Self {
        if score >= thresholds.fake_at {
            Self::Fake
        } else if score >= thresholds.suspicious_at {
            Self::Suspicious
        } else {
            Self::Real
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Suspicious => "suspicious",
            Self::Fake => "fake",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One learned rule that matched during an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedHit {
    pub pattern_id: String,
    /// Delta as stored on the rule.
    pub raw_delta: f64,
    pub severity: Severity,
}

/// Output of the rule engine. Built once per analysis and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub analysis_id: String,
    /// Aggregate score, clamped to [0, 1].
    pub score: f64,
    pub label: Label,
    /// Human-readable reasons in catalogue order.
    pub reasons: Vec<String>,
    pub outcomes: Vec<RuleOutcome>,
    pub learned_hits: Vec<LearnedHit>,
    /// Sum of learned deltas after discount and clamp.
    pub learned_delta: f64,
    pub learned_snapshot_version: u64,
    pub events: Vec<AuditEvent>,
}

impl Decision {
    /// Whether any outcome carries HARD_FAIL.
    pub fn has_hard_fail(&self) -> bool {
        self.outcomes.iter().any(|o| o.severity.is_hard_fail())
    }

    pub fn hard_fail_count(&self) -> usize {
        self.count_severity(Severity::HardFail)
    }

    pub fn critical_count(&self) -> usize {
        self.count_severity(Severity::Critical)
    }

    /// Highest severity among the outcomes, if any fired.
    pub fn max_severity(&self) -> Option<Severity> {
        self.outcomes.iter().map(|o| o.severity).max()
    }

    /// Whether an outcome with the given code fired.
    pub fn fired(&self, code: &str) -> bool {
        self.outcomes.iter().any(|o| o.code == code)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.outcomes.iter().filter(|o| o.severity == severity).count()
    }
}
