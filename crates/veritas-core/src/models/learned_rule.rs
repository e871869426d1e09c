use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{FeatureSet, Severity};

/// What a learned rule matches on. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LearnedPattern {
    TextContains(String),
    MerchantEquals(String),
    CreatorToolContains(String),
    CurrencyEquals(String),
    TotalAbove(f64),
}

impl LearnedPattern {
    pub fn matches(&self, features: &FeatureSet) -> bool {
        match self {
            Self::TextContains(needle) => {
                !needle.is_empty() && features.text.to_lowercase().contains(&needle.to_lowercase())
            }
            Self::MerchantEquals(name) => features
                .merchant_name()
                .is_some_and(|m| m.eq_ignore_ascii_case(name.trim())),
            Self::CreatorToolContains(needle) => {
                let needle = needle.to_lowercase();
                !needle.is_empty() && features.metadata.tool_names().any(|t| t.contains(&needle))
            }
            Self::CurrencyEquals(code) => features
                .currency_code()
                .is_some_and(|c| c.eq_ignore_ascii_case(code.trim())),
            Self::TotalAbove(limit) => features.total().is_some_and(|t| t > *limit),
        }
    }
}

/// A feedback-derived score adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedRule {
    pub pattern_id: String,
    pub pattern: LearnedPattern,
    /// Signed score delta.
    pub delta: f64,
    pub observations: u32,
    pub enabled: bool,
    /// `Info` or `Critical`; learned rules never hard-fail.
    pub severity: Severity,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Immutable, versioned set of learned rules read by one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnedRuleSnapshot {
    pub version: u64,
    pub rules: Vec<LearnedRule>,
}

impl LearnedRuleSnapshot {
    pub fn new(version: u64, rules: Vec<LearnedRule>) -> Self {
        Self { version, rules }
    }

    /// Empty snapshot at version 0.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Enabled rules in stored order.
    pub fn enabled(&self) -> impl Iterator<Item = &LearnedRule> {
        self.rules.iter().filter(|r| r.enabled)
    }
}
