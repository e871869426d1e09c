//! Analyst feedback → learned-rule proposals.
//!
//! Each confirmed analysis adds one observation to every candidate pattern the
//! document matches (`merchant:<name>`, `creator:<tool>`). A candidate's delta
//! follows its Beta posterior: `(p_fraud - 0.5) · 2 · max_rule_delta`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veritas_core::config::LearnedConfig;
use veritas_core::errors::LearningError;
use veritas_core::models::{FeatureSet, LearnedPattern, LearnedRule, Severity};

use crate::beta::BetaEvidence;
use crate::store::LearnedRuleStore;

/// Ground truth an analyst assigned to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalystLabel {
    Genuine,
    Fraud,
}

/// One analyst confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub analysis_id: String,
    pub label: AnalystLabel,
    pub merchant: Option<String>,
    pub creator_tool: Option<String>,
    pub currency: Option<String>,
    /// Rule codes that fired on the analysis.
    #[serde(default)]
    pub fired_codes: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Build a record from the analysed features.
    pub fn from_features(
        features: &FeatureSet,
        label: AnalystLabel,
        fired_codes: Vec<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            analysis_id: features.analysis_id.clone(),
            label,
            merchant: features.merchant_name().map(str::to_string),
            creator_tool: features.metadata.creator_tool.clone(),
            currency: features.currency_code(),
            fired_codes,
            recorded_at,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    pattern: LearnedPattern,
    evidence: BetaEvidence,
    /// Codes that fired alongside fraud confirmations.
    co_fired: BTreeSet<String>,
    last_seen: DateTime<Utc>,
}

/// Accumulates feedback and proposes learned rules.
#[derive(Debug, Clone)]
pub struct FeedbackLearner {
    config: LearnedConfig,
    candidates: BTreeMap<String, Candidate>,
    records: usize,
}

impl FeedbackLearner {
    pub fn new(config: LearnedConfig) -> Self {
        Self {
            config,
            candidates: BTreeMap::new(),
            records: 0,
        }
    }

    /// Fold one record into the candidate evidence. Returns the candidate ids it touched.
    pub fn record(&mut self, record: &FeedbackRecord) -> Vec<String> {
        self.records += 1;
        let fraud = record.label == AnalystLabel::Fraud;

        let mut touched = Vec::new();
        for (pattern_id, pattern) in candidate_patterns(record) {
            let candidate = self.candidates.entry(pattern_id.clone()).or_insert_with(|| Candidate {
                pattern,
                evidence: BetaEvidence::default(),
                co_fired: BTreeSet::new(),
                last_seen: record.recorded_at,
            });
            candidate.evidence.observe(fraud);
            candidate.last_seen = candidate.last_seen.max(record.recorded_at);
            if fraud {
                candidate.co_fired.extend(record.fired_codes.iter().cloned());
            }
            touched.push(pattern_id);
        }

        tracing::debug!(
            analysis_id = %record.analysis_id,
            label = ?record.label,
            candidates = touched.len(),
            "feedback recorded"
        );
        touched
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Fraud probability for one candidate.
    pub fn fraud_probability(&self, pattern_id: &str) -> Option<f64> {
        self.candidates.get(pattern_id).map(|c| c.evidence.fraud_probability())
    }

    /// Current proposal for every candidate, in id order.
    pub fn proposals(&self) -> Vec<LearnedRule> {
        self.candidates
            .iter()
            .map(|(pattern_id, candidate)| {
                let p_fraud = candidate.evidence.fraud_probability();
                let delta = (p_fraud - 0.5) * 2.0 * self.config.max_rule_delta;
                let observations = candidate.evidence.observations();

                let mut evidence = vec![
                    format!(
                        "{} fraud / {} genuine confirmations",
                        candidate.evidence.fraud, candidate.evidence.genuine
                    ),
                    format!("p_fraud={p_fraud:.3}"),
                    format!("last_seen={}", candidate.last_seen.to_rfc3339()),
                ];
                if !candidate.co_fired.is_empty() {
                    let codes: Vec<&str> = candidate.co_fired.iter().map(String::as_str).collect();
                    evidence.push(format!("co-fired: {}", codes.join(", ")));
                }

                LearnedRule {
                    pattern_id: pattern_id.clone(),
                    pattern: candidate.pattern.clone(),
                    delta,
                    observations,
                    enabled: observations >= self.config.min_observations,
                    severity: Severity::Info,
                    evidence,
                }
            })
            .collect()
    }

    /// Publish the current proposals as the store's next snapshot.
    pub fn publish_to(&self, store: &LearnedRuleStore) -> Result<u64, LearningError> {
        store.publish(self.proposals())
    }
}

fn candidate_patterns(record: &FeedbackRecord) -> Vec<(String, LearnedPattern)> {
    let mut patterns = Vec::new();
    if let Some(merchant) = normalized(record.merchant.as_deref()) {
        patterns.push((
            format!("merchant:{merchant}"),
            LearnedPattern::MerchantEquals(merchant),
        ));
    }
    if let Some(tool) = normalized(record.creator_tool.as_deref()) {
        patterns.push((
            format!("creator:{tool}"),
            LearnedPattern::CreatorToolContains(tool),
        ));
    }
    patterns
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
