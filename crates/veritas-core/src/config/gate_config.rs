use serde::{Deserialize, Serialize};

use super::defaults;

/// Document-profile gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentGateConfig {
    /// Document confidence at or above which field-presence rules run.
    pub min_confidence: f64,
    /// Multiplier applied to learned-rule influence below `min_confidence`.
    pub low_confidence_discount: f64,
}

impl Default for DocumentGateConfig {
    fn default() -> Self {
        Self {
            min_confidence: defaults::DEFAULT_DOC_MIN_CONFIDENCE,
            low_confidence_discount: defaults::DEFAULT_DOC_LOW_CONFIDENCE_DISCOUNT,
        }
    }
}
