use serde::{Deserialize, Serialize};

use super::defaults;

/// Built-in rule parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Absolute tolerance when comparing amounts.
    pub amount_tolerance: f64,
    /// Relative tolerance when comparing amounts (fraction of the total).
    pub amount_relative_tolerance: f64,
    /// Document dates older than this many days before capture are flagged.
    pub date_gap_days: i64,
    /// Document dates may lead the capture date by this many hours (time zones).
    pub capture_grace_hours: i64,
    /// Metadata modification within this window of creation is ignored.
    pub metadata_grace_minutes: i64,
    /// Round totals below this value are not flagged.
    pub round_total_minimum: f64,
    /// Return an error instead of failing safe on non-canonical profiles.
    pub strict_consistency: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: defaults::DEFAULT_AMOUNT_TOLERANCE,
            amount_relative_tolerance: defaults::DEFAULT_AMOUNT_RELATIVE_TOLERANCE,
            date_gap_days: defaults::DEFAULT_DATE_GAP_DAYS,
            capture_grace_hours: defaults::DEFAULT_CAPTURE_GRACE_HOURS,
            metadata_grace_minutes: defaults::DEFAULT_METADATA_GRACE_MINUTES,
            round_total_minimum: defaults::DEFAULT_ROUND_TOTAL_MINIMUM,
            strict_consistency: defaults::DEFAULT_STRICT_CONSISTENCY,
        }
    }
}
