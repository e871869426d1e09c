use serde::{Deserialize, Serialize};

use super::defaults;

/// Reconciliation branch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Confidence reported when a HARD_FAIL forces fake.
    pub hard_fail_confidence: f64,
    /// Confidence reported when the rule score alone forces fake.
    pub rule_fake_confidence: f64,
    /// CRITICAL outcomes that force fake even below the fake threshold.
    pub critical_count_for_fake: usize,
    /// Fraud confidence a veto-capable engine needs to reject.
    pub veto_threshold: f64,
    /// External confidence regarded as high.
    pub high_confidence: f64,
    /// External confidence regarded as usable.
    pub low_confidence: f64,
    /// Agreement regarded as high.
    pub agreement_threshold: f64,
    /// Added to the blend when rule and external verdicts agree.
    pub agreement_bonus: f64,
    /// Subtracted from blended confidence per absent optional engine.
    pub missing_optional_penalty: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            hard_fail_confidence: defaults::DEFAULT_HARD_FAIL_CONFIDENCE,
            rule_fake_confidence: defaults::DEFAULT_RULE_FAKE_CONFIDENCE,
            critical_count_for_fake: defaults::DEFAULT_CRITICAL_COUNT_FOR_FAKE,
            veto_threshold: defaults::DEFAULT_VETO_THRESHOLD,
            high_confidence: defaults::DEFAULT_HIGH_CONFIDENCE,
            low_confidence: defaults::DEFAULT_LOW_CONFIDENCE,
            agreement_threshold: defaults::DEFAULT_AGREEMENT_THRESHOLD,
            agreement_bonus: defaults::DEFAULT_AGREEMENT_BONUS,
            missing_optional_penalty: defaults::DEFAULT_MISSING_OPTIONAL_PENALTY,
        }
    }
}
