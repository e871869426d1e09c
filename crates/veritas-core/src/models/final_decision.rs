use serde::{Deserialize, Serialize};
use std::fmt;

/// Label after reconciliation with external engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalLabel {
    Real,
    Fake,
    NeedsHumanReview,
    Incomplete,
}

impl FinalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Fake => "fake",
            Self::NeedsHumanReview => "needs_human_review",
            Self::Incomplete => "incomplete",
        }
    }

    pub fn recommended_action(&self) -> RecommendedAction {
        match self {
            Self::Real => RecommendedAction::Accept,
            Self::Fake => RecommendedAction::Reject,
            Self::NeedsHumanReview => RecommendedAction::Review,
            Self::Incomplete => RecommendedAction::RetryOrReview,
        }
    }
}

impl fmt::Display for FinalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller should do with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Accept,
    Review,
    Reject,
    RetryOrReview,
}

/// The reconciliation branch that produced the final label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    /// A HARD_FAIL rule fired.
    HardFail,
    /// A critical engine did not complete.
    CriticalEngineMissing,
    /// Rule score or CRITICAL count alone is decisive.
    RuleDrivenFake,
    /// A veto-capable engine reported high-confidence fraud.
    ExternalVeto,
    /// Confident external genuine verdict against rule CRITICALs.
    ConflictReview,
    /// Rules and engines agree the document is genuine.
    PositiveAgreement,
    /// Self-consistent rules carry the decision.
    RuleWeighted,
    /// Weak engines and ambiguous rules.
    AmbiguousReview,
    /// Nothing matched.
    DefaultReview,
}

impl DecisionPath {
    /// Stable audit code for the branch.
    pub fn code(&self) -> &'static str {
        match self {
            Self::HardFail => "RECON_HARD_FAIL",
            Self::CriticalEngineMissing => "RECON_CRITICAL_ENGINE_MISSING",
            Self::RuleDrivenFake => "RECON_RULE_DRIVEN_FAKE",
            Self::ExternalVeto => "RECON_EXTERNAL_VETO",
            Self::ConflictReview => "RECON_CONFLICT_REVIEW",
            Self::PositiveAgreement => "RECON_POSITIVE_AGREEMENT",
            Self::RuleWeighted => "RECON_RULE_WEIGHTED",
            Self::AmbiguousReview => "RECON_AMBIGUOUS_REVIEW",
            Self::DefaultReview => "RECON_DEFAULT_REVIEW",
        }
    }
}
