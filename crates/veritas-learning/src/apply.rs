//! Application of one learned-rule snapshot to one document.

use serde_json::json;
use veritas_core::audit::{AuditCategory, AuditSource, AuditTrail};
use veritas_core::config::LearnedConfig;
use veritas_core::constants::LEARNED_CODE_PREFIX;
use veritas_core::models::{FeatureSet, LearnedHit, LearnedRuleSnapshot, RuleOutcome};

/// What a snapshot contributed to one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnedApplication {
    /// Sum of matched deltas after discount and clamp.
    pub delta: f64,
    /// Sum of matched deltas before discount and clamp.
    pub raw_delta: f64,
    /// Clamp bound that applied.
    pub bound: f64,
    pub hits: Vec<LearnedHit>,
    /// One outcome per hit whose discounted delta is positive, scaled so the
    /// outcomes never claim more than the clamped total.
    pub outcomes: Vec<RuleOutcome>,
}

/// Outcome code for a learned pattern: `LEARNED_` plus the upper-cased id with every
/// non-alphanumeric character replaced by `_`.
pub fn learned_code(pattern_id: &str) -> String {
    let suffix: String = pattern_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{LEARNED_CODE_PREFIX}{suffix}")
}

/// Match every enabled rule in `snapshot` against `features`.
///
/// `discount` is the document gate's discount. `low_doc_confidence` selects the tight
/// clamp. Every hit is recorded on `trail` as an INFO event.
pub fn apply(
    snapshot: &LearnedRuleSnapshot,
    features: &FeatureSet,
    discount: f64,
    low_doc_confidence: bool,
    config: &LearnedConfig,
    trail: &mut AuditTrail,
) -> LearnedApplication {
    let bound = if low_doc_confidence {
        config.low_confidence_clamp
    } else {
        config.max_total_delta
    };

    let mut application = LearnedApplication {
        bound,
        ..LearnedApplication::default()
    };

    for rule in snapshot.enabled().filter(|r| r.pattern.matches(features)) {
        // Snapshots built without `publish` may carry oversized deltas.
        let raw = if rule.delta.is_finite() {
            rule.delta.clamp(-config.max_rule_delta, config.max_rule_delta)
        } else {
            0.0
        };
        let effective = raw * discount;
        let code = learned_code(&rule.pattern_id);

        trail.info(
            AuditSource::LearnedRules,
            AuditCategory::Learned,
            code.clone(),
            format!("learned pattern {} matched", rule.pattern_id),
            json!({
                "pattern_id": rule.pattern_id,
                "stored_delta": rule.delta,
                "raw_delta": raw,
                "discount": discount,
                "effective_delta": effective,
                "snapshot_version": snapshot.version,
            }),
        );

        if effective > 0.0 {
            application.outcomes.push(RuleOutcome::new(
                format!("learned.{}", rule.pattern_id),
                code,
                rule.severity,
                effective,
                format!("matches learned pattern {}", rule.pattern_id),
                json!({
                    "pattern": rule.pattern,
                    "observations": rule.observations,
                    "evidence": rule.evidence,
                }),
            ));
        }

        application.raw_delta += raw;
        application.hits.push(LearnedHit {
            pattern_id: rule.pattern_id.clone(),
            raw_delta: rule.delta,
            severity: rule.severity,
        });
    }

    let unclamped = application.raw_delta * discount;
    application.delta = unclamped.clamp(-bound, bound);
    if application.delta != unclamped {
        let factor = application.delta / unclamped;
        for outcome in &mut application.outcomes {
            if let Some(evidence) = outcome.evidence.as_object_mut() {
                evidence.insert("unclamped_contribution".to_string(), json!(outcome.contribution));
                evidence.insert("clamp_factor".to_string(), json!(factor));
            }
            outcome.contribution *= factor;
        }
    }
    application
}
