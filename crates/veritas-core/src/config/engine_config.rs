use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::EngineTier;

/// External engine execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of optional engine calls allowed in flight at once.
    pub worker_pool_size: usize,
    /// Permits held back for critical engines. Optional engines never draw on them.
    pub critical_pool_size: usize,
    /// Timeout for fast deterministic engines.
    pub deterministic_timeout_ms: u64,
    /// Timeout for model-backed engines.
    pub model_timeout_ms: u64,
    /// Timeout for large-model engines. Bounds worst-case latency.
    pub large_model_timeout_ms: u64,
    /// Per-engine timeout overrides keyed by engine name.
    pub timeout_overrides_ms: BTreeMap<String, u64>,
}

impl EngineConfig {
    /// Effective timeout for an engine: override first, then its tier.
    pub fn timeout_for(&self, engine: &str, tier: EngineTier) -> Duration {
        let ms = self
            .timeout_overrides_ms
            .get(engine)
            .copied()
            .unwrap_or(match tier {
                EngineTier::Deterministic => self.deterministic_timeout_ms,
                EngineTier::ModelBacked => self.model_timeout_ms,
                EngineTier::LargeModel => self.large_model_timeout_ms,
            });
        Duration::from_millis(ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: defaults::DEFAULT_WORKER_POOL_SIZE,
            critical_pool_size: defaults::DEFAULT_CRITICAL_POOL_SIZE,
            deterministic_timeout_ms: defaults::DEFAULT_DETERMINISTIC_TIMEOUT_MS,
            model_timeout_ms: defaults::DEFAULT_MODEL_TIMEOUT_MS,
            large_model_timeout_ms: defaults::DEFAULT_LARGE_MODEL_TIMEOUT_MS,
            timeout_overrides_ms: BTreeMap::new(),
        }
    }
}
