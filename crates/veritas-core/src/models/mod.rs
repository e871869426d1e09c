mod decision;
mod doc_profile;
mod engine_verdict;
mod feature_set;
mod final_decision;
mod geo_profile;
mod hints;
mod learned_rule;
mod rule_outcome;
mod severity;

pub use decision::{Decision, Label, LearnedHit};
pub use doc_profile::{DocCandidate, DocFamily, DocProfile, DocSubtype};
pub use engine_verdict::{
    EngineOutput, EngineRole, EngineStatus, EngineTier, EngineVerdict, RawConfidence, VerdictTag,
};
pub use feature_set::{AmountLabel, DetectedAmount, DocumentMetadata, FeatureSet, LineItem};
pub use final_decision::{DecisionPath, FinalLabel, RecommendedAction};
pub use geo_profile::{Country, GeoDiagnostics, GeoProfile};
pub use hints::ClassificationHints;
pub use learned_rule::{LearnedPattern, LearnedRule, LearnedRuleSnapshot};
pub use rule_outcome::RuleOutcome;
pub use severity::Severity;
