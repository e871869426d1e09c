//! EnsembleReconciler: the decision-path state machine.
//!
//! Branches are checked in a fixed order and the first match wins:
//!
//! 1. HARD_FAIL outcome: fake.
//! 2. Critical engine absent: incomplete.
//! 3. Rule score at the fake threshold or enough CRITICALs: fake.
//! 4. Veto-capable engine reports fraud with high confidence: fake.
//! 5. High-confidence genuine verdict against rule CRITICALs: review.
//! 6. Clean rules and every available engine genuine: real.
//! 7. No CRITICALs and high agreement, or clean rules with no engines: real.
//! 8. Low external confidence with ambiguous rule signals: review.
//! 9. Anything else: review.
//!
//! Exactly one [`ReconciliationEvent`] is emitted per call.

use serde_json::json;
use veritas_core::audit::{
    AuditCategory, AuditSource, AuditTrail, ReconciliationEvent, ReconciliationInputs,
    VerdictInput,
};
use veritas_core::config::{EnsembleConfig, ThresholdsConfig, VeritasConfig};
use veritas_core::models::{
    Decision, DecisionPath, EngineVerdict, FinalLabel, Label, RecommendedAction, Severity,
    VerdictTag,
};

/// Confidence reported on review and incomplete outcomes.
const REVIEW_CONFIDENCE: f64 = 0.5;
/// Stand-in for a missing agreement or external confidence in blends.
const NEUTRAL: f64 = 0.5;

/// Final outcome of reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub label: FinalLabel,
    pub confidence: f64,
    pub action: RecommendedAction,
    pub path: DecisionPath,
    pub agreement: Option<f64>,
    pub event: ReconciliationEvent,
}

/// Combines the rule [`Decision`] with external verdicts.
#[derive(Debug, Clone, Default)]
pub struct EnsembleReconciler {
    config: EnsembleConfig,
    thresholds: ThresholdsConfig,
}

impl EnsembleReconciler {
    pub fn new(config: &VeritasConfig) -> Self {
        Self {
            config: config.ensemble.clone(),
            thresholds: config.thresholds.clone(),
        }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Confidence-weighted concordance between the rule direction and the
    /// available verdicts. `None` when no verdict is available.
    pub fn agreement(&self, decision: &Decision, verdicts: &[EngineVerdict]) -> Option<f64> {
        let rule_says_fraud = decision.label == Label::Fake;
        let available: Vec<&EngineVerdict> = verdicts.iter().filter(|v| v.is_available()).collect();
        if available.is_empty() {
            return None;
        }
        let concord = |v: &EngineVerdict| match v.tag {
            VerdictTag::Uncertain => 0.5,
            VerdictTag::Fraud if rule_says_fraud => 1.0,
            VerdictTag::Genuine if !rule_says_fraud => 1.0,
            _ => 0.0,
        };
        let weight: f64 = available.iter().map(|v| v.confidence).sum();
        let value = if weight > 0.0 {
            available.iter().map(|v| v.confidence * concord(*v)).sum::<f64>() / weight
        } else {
            available.iter().map(|v| concord(*v)).sum::<f64>() / available.len() as f64
        };
        Some(value.clamp(0.0, 1.0))
    }

    /// Run the state machine and append its events to `trail`.
    pub fn reconcile(
        &self,
        decision: &Decision,
        verdicts: &[EngineVerdict],
        trail: &mut AuditTrail,
    ) -> Reconciliation {
        let _span = tracing::info_span!("veritas.reconcile", analysis_id = %decision.analysis_id).entered();
        let c = &self.config;

        let available: Vec<&EngineVerdict> = verdicts.iter().filter(|v| v.is_available()).collect();
        let missing_optional: Vec<String> = verdicts
            .iter()
            .filter(|v| !v.is_available() && !v.role.critical)
            .map(|v| v.engine.clone())
            .collect();
        for engine in &missing_optional {
            trail.info(
                AuditSource::Reconciler,
                AuditCategory::Engine,
                "OPTIONAL_ENGINE_ABSENT",
                format!("optional engine {engine} absent; blended confidence lowered"),
                json!({ "engine": engine, "penalty": c.missing_optional_penalty }),
            );
        }

        let score = decision.score;
        let hard_fails = decision.hard_fail_count();
        let criticals = decision.critical_count();
        let agreement = self.agreement(decision, verdicts);
        let penalty = c.missing_optional_penalty * missing_optional.len() as f64;

        let max_conf = |tag: VerdictTag| {
            available
                .iter()
                .filter(|v| v.tag == tag)
                .map(|v| v.confidence)
                .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.max(x))))
        };
        let mean_external = (!available.is_empty())
            .then(|| available.iter().map(|v| v.confidence).sum::<f64>() / available.len() as f64);
        let any_fraud = available.iter().any(|v| v.tag == VerdictTag::Fraud);
        let strongest = available.iter().map(|v| v.confidence).fold(0.0, f64::max);

        let veto = available
            .iter()
            .filter(|v| {
                v.role.veto_capable && v.tag == VerdictTag::Fraud && v.confidence >= c.veto_threshold
            })
            .map(|v| v.confidence)
            .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.max(x))));
        let strong_genuine = max_conf(VerdictTag::Genuine).filter(|g| *g >= c.high_confidence);
        let critical_missing = verdicts.iter().any(|v| v.role.critical && !v.is_available());

        let (path, label, confidence) = if hard_fails > 0 {
            (DecisionPath::HardFail, FinalLabel::Fake, c.hard_fail_confidence)
        } else if critical_missing {
            (DecisionPath::CriticalEngineMissing, FinalLabel::Incomplete, REVIEW_CONFIDENCE)
        } else if score >= self.thresholds.fake_at || criticals >= c.critical_count_for_fake {
            (DecisionPath::RuleDrivenFake, FinalLabel::Fake, c.rule_fake_confidence)
        } else if let Some(veto) = veto {
            (DecisionPath::ExternalVeto, FinalLabel::Fake, 0.6 + 0.35 * veto)
        } else if let (Some(external), true) = (strong_genuine, criticals > 0) {
            (
                DecisionPath::ConflictReview,
                FinalLabel::NeedsHumanReview,
                0.5 * external + 0.5 * score,
            )
        } else if decision.label == Label::Real
            && criticals == 0
            && !available.is_empty()
            && available
                .iter()
                .all(|v| v.tag == VerdictTag::Genuine && v.confidence >= c.low_confidence)
        {
            let external = mean_external.unwrap_or(NEUTRAL);
            let bonus = if agreement.is_some_and(|a| a >= c.agreement_threshold) {
                c.agreement_bonus
            } else {
                0.0
            };
            (
                DecisionPath::PositiveAgreement,
                FinalLabel::Real,
                0.4 * (1.0 - score) + 0.6 * external + bonus - penalty,
            )
        } else if criticals == 0
            && decision.label != Label::Fake
            && ((agreement.is_some_and(|a| a >= c.agreement_threshold) && !any_fraud)
                || (available.is_empty() && decision.label == Label::Real))
        {
            let a = agreement.unwrap_or(NEUTRAL);
            let external = mean_external.unwrap_or(NEUTRAL);
            (
                DecisionPath::RuleWeighted,
                FinalLabel::Real,
                0.45 * a + 0.35 * external + 0.2 * (1.0 - score) - penalty,
            )
        } else if strongest < c.high_confidence
            && (decision.label == Label::Suspicious || criticals > 0)
        {
            (DecisionPath::AmbiguousReview, FinalLabel::NeedsHumanReview, REVIEW_CONFIDENCE)
        } else {
            (DecisionPath::DefaultReview, FinalLabel::NeedsHumanReview, REVIEW_CONFIDENCE)
        };
        let confidence = confidence.clamp(0.0, 1.0);

        let inputs = ReconciliationInputs {
            rule_score: score,
            rule_label: decision.label,
            hard_fail_count: hard_fails,
            critical_count: criticals,
            verdicts: verdicts
                .iter()
                .map(|v| VerdictInput {
                    engine: v.engine.clone(),
                    status: v.status,
                    tag: v.tag,
                    confidence: v.confidence,
                    critical: v.role.critical,
                    veto_capable: v.role.veto_capable,
                })
                .collect(),
            agreement,
            missing_optional,
        };
        let severity = match label {
            FinalLabel::Fake | FinalLabel::Incomplete => Severity::Critical,
            FinalLabel::Real | FinalLabel::NeedsHumanReview => Severity::Info,
        };
        let event = trail
            .record(
                AuditSource::Reconciler,
                AuditCategory::Reconciliation,
                severity,
                path.code(),
                format!("{} via {} at confidence {confidence:.2}", label, path.code()),
                json!({
                    "path": path,
                    "final_label": label,
                    "final_confidence": confidence,
                    "inputs": inputs,
                }),
            )
            .clone();

        tracing::info!(
            path = path.code(),
            label = %label,
            confidence,
            agreement = agreement.unwrap_or(-1.0),
            "reconciled"
        );

        Reconciliation {
            label,
            confidence,
            action: label.recommended_action(),
            path,
            agreement,
            event: ReconciliationEvent {
                event,
                path,
                inputs,
                final_label: label,
                final_confidence: confidence,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use veritas_core::models::{EngineRole, EngineStatus, RuleOutcome};

    fn decision(score: f64, severities: &[Severity]) -> Decision {
        let t = ThresholdsConfig::default();
        let hard = severities.iter().any(|s| s.is_hard_fail());
        Decision {
            analysis_id: "recon-test".to_string(),
            score,
            label: if hard { Label::Fake } else { Label::from_score(score, &t) },
            reasons: vec![],
            outcomes: severities
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    RuleOutcome::new(format!("r{i}"), format!("R{i}"), *s, 0.0, "x", json!({}))
                })
                .collect(),
            learned_hits: vec![],
            learned_delta: 0.0,
            learned_snapshot_version: 0,
            events: vec![],
        }
    }

    fn verdict(name: &str, tag: VerdictTag, confidence: f64, critical: bool, veto: bool) -> EngineVerdict {
        EngineVerdict {
            engine: name.to_string(),
            role: EngineRole { critical, veto_capable: veto },
            status: EngineStatus::Completed,
            tag,
            confidence,
            observations: vec![],
            error: None,
        }
    }

    fn absent(name: &str, critical: bool) -> EngineVerdict {
        EngineVerdict::absent(
            name,
            EngineRole { critical, veto_capable: false },
            EngineStatus::TimedOut,
            "timed out",
        )
    }

    fn run(d: &Decision, verdicts: &[EngineVerdict]) -> (Reconciliation, AuditTrail) {
        let mut trail = AuditTrail::new("recon-test", Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap());
        let r = EnsembleReconciler::default().reconcile(d, verdicts, &mut trail);
        (r, trail)
    }

    #[test]
    fn hard_fail_beats_everything_including_missing_critical() {
        let d = decision(0.6, &[Severity::HardFail]);
        let (r, _) = run(&d, &[verdict("vision", VerdictTag::Genuine, 0.99, false, true), absent("core", true)]);
        assert_eq!(r.path, DecisionPath::HardFail);
        assert_eq!(r.label, FinalLabel::Fake);
        assert_eq!(r.confidence, 0.93);
    }

    #[test]
    fn missing_critical_engine_is_incomplete() {
        let (r, _) = run(&decision(0.0, &[]), &[absent("core", true)]);
        assert_eq!(r.label, FinalLabel::Incomplete);
        assert_eq!(r.action, RecommendedAction::RetryOrReview);
    }

    #[test]
    fn three_criticals_force_fake() {
        let d = decision(0.45, &[Severity::Critical, Severity::Critical, Severity::Critical]);
        let (r, _) = run(&d, &[verdict("vision", VerdictTag::Genuine, 0.95, false, true)]);
        assert_eq!(r.path, DecisionPath::RuleDrivenFake);
        assert_eq!(r.confidence, 0.85);
    }

    #[test]
    fn veto_flips_real_to_fake() {
        let (r, _) = run(&decision(0.05, &[]), &[verdict("vision", VerdictTag::Fraud, 0.9, false, true)]);
        assert_eq!(r.path, DecisionPath::ExternalVeto);
        assert_eq!(r.label, FinalLabel::Fake);
        assert!((r.confidence - (0.6 + 0.35 * 0.9)).abs() < 1e-12);
    }

    #[test]
    fn non_veto_fraud_cannot_reject() {
        let (r, _) = run(&decision(0.05, &[]), &[verdict("extractor", VerdictTag::Fraud, 0.95, false, false)]);
        assert_ne!(r.label, FinalLabel::Fake);
    }

    #[test]
    fn clean_verdict_against_criticals_goes_to_review() {
        let d = decision(0.30, &[Severity::Critical]);
        let (r, _) = run(&d, &[verdict("vision", VerdictTag::Genuine, 0.9, false, true)]);
        assert_eq!(r.path, DecisionPath::ConflictReview);
        assert_eq!(r.label, FinalLabel::NeedsHumanReview);
        assert!((r.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn positive_agreement_with_bonus() {
        let (r, _) = run(&decision(0.05, &[]), &[verdict("vision", VerdictTag::Genuine, 0.9, false, true)]);
        assert_eq!(r.path, DecisionPath::PositiveAgreement);
        assert_eq!(r.label, FinalLabel::Real);
        // 0.4 * 0.95 + 0.6 * 0.9 + 0.05
        assert!((r.confidence - 0.97).abs() < 1e-9);
        assert_eq!(r.agreement, Some(1.0));
    }

    #[test]
    fn suspicious_rules_with_clean_engine_are_rule_weighted_real() {
        let d = decision(0.45, &[Severity::Info, Severity::Info]);
        assert_eq!(d.label, Label::Suspicious);
        let (r, _) = run(&d, &[verdict("vision", VerdictTag::Genuine, 0.9, false, true)]);
        assert_eq!(r.path, DecisionPath::RuleWeighted);
        assert_eq!(r.label, FinalLabel::Real);
        assert!(r.confidence >= 0.75);
    }

    #[test]
    fn no_engines_and_clean_rules_is_real() {
        let (r, _) = run(&decision(0.0, &[]), &[]);
        assert_eq!(r.path, DecisionPath::RuleWeighted);
        // 0.45 * 0.5 + 0.35 * 0.5 + 0.2
        assert!((r.confidence - 0.6).abs() < 1e-9);
        assert_eq!(r.agreement, None);
    }

    #[test]
    fn absent_optional_engine_lowers_blend_and_is_audited() {
        let d = decision(0.0, &[]);
        let (full, _) = run(&d, &[verdict("vision", VerdictTag::Genuine, 0.9, false, true)]);
        let (degraded, trail) = run(
            &d,
            &[verdict("vision", VerdictTag::Genuine, 0.9, false, true), absent("extractor", false)],
        );
        assert_eq!(degraded.label, FinalLabel::Real);
        assert!((full.confidence - degraded.confidence - 0.05).abs() < 1e-9);
        assert_eq!(trail.with_code("OPTIONAL_ENGINE_ABSENT").count(), 1);
    }

    #[test]
    fn ambiguous_signals_go_to_review() {
        let d = decision(0.35, &[Severity::Critical]);
        let (r, _) = run(&d, &[verdict("vision", VerdictTag::Uncertain, 0.4, false, true)]);
        assert_eq!(r.path, DecisionPath::AmbiguousReview);
        assert_eq!(r.action, RecommendedAction::Review);
    }

    #[test]
    fn exactly_one_reconciliation_event() {
        let cases = [
            (decision(0.6, &[Severity::HardFail]), vec![]),
            (decision(0.0, &[]), vec![absent("core", true)]),
            (decision(0.35, &[Severity::Critical]), vec![verdict("v", VerdictTag::Fraud, 0.3, false, false)]),
            (decision(0.0, &[]), vec![]),
        ];
        for (d, verdicts) in cases {
            let (r, trail) = run(&d, &verdicts);
            let recon: Vec<_> = trail
                .events()
                .iter()
                .filter(|e| e.category == AuditCategory::Reconciliation)
                .collect();
            assert_eq!(recon.len(), 1);
            assert_eq!(recon[0].code, r.path.code());
            assert_eq!(r.event.event, *recon[0]);
        }
    }
}
