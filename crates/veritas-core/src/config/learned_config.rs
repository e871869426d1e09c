use serde::{Deserialize, Serialize};

use super::defaults;

/// Learned-rule bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedConfig {
    /// Hard clamp on the total learned delta under low document confidence.
    pub low_confidence_clamp: f64,
    /// Clamp on the total learned delta otherwise.
    pub max_total_delta: f64,
    /// Largest delta a single learned rule may carry.
    pub max_rule_delta: f64,
    /// Observations a feedback proposal needs before it is enabled.
    pub min_observations: u32,
}

impl Default for LearnedConfig {
    fn default() -> Self {
        Self {
            low_confidence_clamp: defaults::DEFAULT_LEARNED_LOW_CONFIDENCE_CLAMP,
            max_total_delta: defaults::DEFAULT_LEARNED_MAX_TOTAL_DELTA,
            max_rule_delta: defaults::DEFAULT_LEARNED_MAX_RULE_DELTA,
            min_observations: defaults::DEFAULT_LEARNED_MIN_OBSERVATIONS,
        }
    }
}
