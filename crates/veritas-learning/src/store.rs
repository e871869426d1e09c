//! LearnedRuleStore: atomic publication of immutable rule snapshots.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use veritas_core::config::LearnedConfig;
use veritas_core::errors::LearningError;
use veritas_core::models::{LearnedRule, LearnedRuleSnapshot, Severity};

/// Holds the current learned-rule snapshot.
///
/// Readers clone the `Arc` once per analysis and never observe a half-published set.
/// Publishing swaps the whole snapshot and bumps its version.
#[derive(Debug)]
pub struct LearnedRuleStore {
    config: LearnedConfig,
    current: RwLock<Arc<LearnedRuleSnapshot>>,
}

impl LearnedRuleStore {
    pub fn new(config: LearnedConfig) -> Self {
        Self {
            config,
            current: RwLock::new(LearnedRuleSnapshot::empty()),
        }
    }

    /// The snapshot an analysis should read.
    pub fn snapshot(&self) -> Arc<LearnedRuleSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// Validate `rules` and publish them as the next snapshot. Returns the new version.
    pub fn publish(&self, rules: Vec<LearnedRule>) -> Result<u64, LearningError> {
        validate(&rules, &self.config)?;
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = guard.version + 1;
        *guard = Arc::new(LearnedRuleSnapshot::new(version, rules));
        tracing::info!(
            event = "learned_rules_published",
            version,
            rules = guard.rules.len(),
            enabled = guard.enabled().count(),
            "learned rule snapshot published"
        );
        Ok(version)
    }
}

/// Check a rule set against the learned-rule constraints.
pub fn validate(rules: &[LearnedRule], config: &LearnedConfig) -> Result<(), LearningError> {
    let mut seen = BTreeSet::new();
    for rule in rules {
        if rule.severity == Severity::HardFail {
            return Err(LearningError::ForbiddenSeverity {
                pattern_id: rule.pattern_id.clone(),
                severity: rule.severity.as_str().to_string(),
            });
        }
        if !rule.delta.is_finite() || rule.delta.abs() > config.max_rule_delta {
            return Err(LearningError::DeltaOutOfBounds {
                pattern_id: rule.pattern_id.clone(),
                delta: rule.delta,
                bound: config.max_rule_delta,
            });
        }
        if !seen.insert(rule.pattern_id.as_str()) {
            return Err(LearningError::DuplicatePattern {
                pattern_id: rule.pattern_id.clone(),
            });
        }
    }
    Ok(())
}
