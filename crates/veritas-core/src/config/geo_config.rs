use serde::{Deserialize, Serialize};

use super::defaults;

/// Geography inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Below this confidence the country is reported as UNKNOWN with confidence 0.
    pub unknown_floor: f64,
    /// Minimum raw score the winning region needs.
    pub min_winner_score: f64,
    /// Confidence cap when the winner has no strong signal.
    pub no_strong_signal_cap: f64,
    /// Floor of the confidence denominator, so a lone weak hit cannot reach 1.0.
    pub denominator_floor: f64,
    /// Confidence under this value is penalized.
    pub low_confidence_cutoff: f64,
    /// Multiplier applied to low confidence.
    pub low_confidence_penalty: f64,
    /// A runner-up at or above this share of the winner's score is also plausible.
    pub plausible_ratio: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            unknown_floor: defaults::DEFAULT_GEO_UNKNOWN_FLOOR,
            min_winner_score: defaults::DEFAULT_GEO_MIN_WINNER_SCORE,
            no_strong_signal_cap: defaults::DEFAULT_GEO_NO_STRONG_SIGNAL_CAP,
            denominator_floor: defaults::DEFAULT_GEO_DENOMINATOR_FLOOR,
            low_confidence_cutoff: defaults::DEFAULT_GEO_LOW_CONFIDENCE_CUTOFF,
            low_confidence_penalty: defaults::DEFAULT_GEO_LOW_CONFIDENCE_PENALTY,
            plausible_ratio: defaults::DEFAULT_GEO_PLAUSIBLE_RATIO,
        }
    }
}
