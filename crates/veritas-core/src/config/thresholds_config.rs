use serde::{Deserialize, Serialize};

use super::defaults;

/// Score boundaries between the rule labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Scores at or above this are at least suspicious.
    pub suspicious_at: f64,
    /// Scores at or above this are fake.
    pub fake_at: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            suspicious_at: defaults::DEFAULT_SUSPICIOUS_AT,
            fake_at: defaults::DEFAULT_FAKE_AT,
        }
    }
}
