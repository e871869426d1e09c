//! RuleEngine: evaluates the catalogue in order and aggregates a [`Decision`].

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::json;
use veritas_core::audit::{AuditCategory, AuditSource, AuditTrail};
use veritas_core::config::{LearnedConfig, RulesConfig, ThresholdsConfig, VeritasConfig};
use veritas_core::errors::{ConsistencyError, VeritasError, VeritasResult};
use veritas_core::models::{
    Decision, DocProfile, FeatureSet, Label, LearnedRuleSnapshot, RuleOutcome,
};
use veritas_core::traits::{IMerchantDirectory, IPostalDirectory};
use veritas_geo::GeoEvidence;

use crate::context::RuleContext;
use crate::gate::DocumentProfileGate;
use crate::rules::{default_catalogue, Finding, Rule};

/// The deterministic rule engine.
///
/// Stateless between analyses: the same features, geography evidence, document
/// profile and learned snapshot always produce the same [`Decision`].
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
    gate: DocumentProfileGate,
    thresholds: ThresholdsConfig,
    rules_config: RulesConfig,
    learned_config: LearnedConfig,
    geo_unknown_floor: f64,
    merchants: Option<Arc<dyn IMerchantDirectory>>,
    postal: Option<Arc<dyn IPostalDirectory>>,
}

impl RuleEngine {
    /// Engine with the built-in catalogue.
    pub fn new(config: &VeritasConfig) -> Self {
        Self::with_rules(config, default_catalogue())
    }

    /// Engine with a custom catalogue, evaluated in the given order.
    pub fn with_rules(config: &VeritasConfig, rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            gate: DocumentProfileGate::new(config.document_gate.clone()),
            thresholds: config.thresholds.clone(),
            rules_config: config.rules.clone(),
            learned_config: config.learned.clone(),
            geo_unknown_floor: config.geo.unknown_floor,
            merchants: None,
            postal: None,
        }
    }

    pub fn with_merchant_directory(mut self, directory: Arc<dyn IMerchantDirectory>) -> Self {
        self.merchants = Some(directory);
        self
    }

    pub fn with_postal_directory(mut self, directory: Arc<dyn IPostalDirectory>) -> Self {
        self.postal = Some(directory);
        self
    }

    pub fn gate(&self) -> &DocumentProfileGate {
        &self.gate
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule and aggregate the result.
    ///
    /// Only a consistency violation under `strict_consistency` returns an error.
    /// Rule faults are recorded and contribute nothing.
    pub fn evaluate(
        &self,
        features: &FeatureSet,
        geo: &GeoEvidence,
        doc: &DocProfile,
        learned: &LearnedRuleSnapshot,
    ) -> VeritasResult<Decision> {
        let mut trail = AuditTrail::new(features.analysis_id.clone(), features.received_at);

        let doc = self.admit_doc(doc, &mut trail)?;
        let geo = self.admit_geo(geo, &mut trail)?;

        let gate_enabled = self.gate.enabled(&doc);
        let discount = self.gate.discount(&doc);
        trail.info(
            AuditSource::DocumentGate,
            AuditCategory::Gating,
            if gate_enabled { "DOC_GATE_ENABLED" } else { "DOC_GATE_LOW_CONFIDENCE" },
            format!(
                "document gate {} at confidence {:.2}",
                if gate_enabled { "enabled" } else { "soft-disabled" },
                doc.confidence()
            ),
            json!({
                "family": doc.family(),
                "subtype": doc.subtype(),
                "confidence": doc.confidence(),
                "learned_discount": discount,
            }),
        );

        let ctx = RuleContext {
            features,
            geo: &geo,
            doc: &doc,
            config: &self.rules_config,
            merchants: self.merchants.as_deref(),
            postal: self.postal.as_deref(),
        };

        let mut outcomes: Vec<RuleOutcome> = Vec::new();
        for rule in &self.rules {
            if let Some(field) = rule.field() {
                let skip = if !gate_enabled {
                    Some("document confidence below gate threshold")
                } else if !self.gate.expects(&doc, field) {
                    Some("document kind does not carry this field")
                } else {
                    None
                };
                if let Some(why) = skip {
                    trail.info(
                        AuditSource::DocumentGate,
                        AuditCategory::Gating,
                        "RULE_SKIPPED",
                        format!("{} skipped: {why}", rule.code()),
                        json!({
                            "rule": rule.code(),
                            "field": field.as_str(),
                            "family": doc.family(),
                            "subtype": doc.subtype(),
                            "confidence": doc.confidence(),
                        }),
                    );
                    continue;
                }
            }

            match run_isolated(rule.as_ref(), &ctx) {
                Ok(Some(finding)) => {
                    trail.record(
                        AuditSource::RuleEngine,
                        AuditCategory::RuleFired,
                        rule.severity(),
                        rule.code(),
                        finding.reason.clone(),
                        finding.evidence.clone(),
                    );
                    outcomes.push(RuleOutcome::new(
                        rule.id(),
                        rule.code(),
                        rule.severity(),
                        rule.contribution(),
                        finding.reason,
                        finding.evidence,
                    ));
                }
                Ok(None) => {}
                Err(reason) => {
                    tracing::warn!(
                        analysis_id = %features.analysis_id,
                        rule = rule.id(),
                        %reason,
                        "rule faulted; contributing zero"
                    );
                    trail.info(
                        AuditSource::RuleEngine,
                        AuditCategory::RuleFault,
                        "RULE_FAULT",
                        format!("{} faulted: {reason}", rule.code()),
                        json!({ "rule": rule.id(), "code": rule.code(), "reason": reason }),
                    );
                }
            }
        }

        let builtin: f64 = outcomes.iter().map(|o| o.contribution).sum();
        let learned_app = veritas_learning::apply(
            learned,
            features,
            discount,
            !gate_enabled,
            &self.learned_config,
            &mut trail,
        );
        outcomes.extend(learned_app.outcomes);

        let score = (builtin + learned_app.delta).clamp(0.0, 1.0);
        let hard_fail = outcomes.iter().any(|o| o.severity.is_hard_fail());
        let label = if hard_fail {
            Label::Fake
        } else {
            Label::from_score(score, &self.thresholds)
        };
        let reasons: Vec<String> = outcomes
            .iter()
            .map(|o| format!("{}: {}", o.code, o.reason))
            .collect();

        tracing::debug!(
            analysis_id = %features.analysis_id,
            score,
            label = %label,
            fired = outcomes.len(),
            learned_delta = learned_app.delta,
            "rules evaluated"
        );

        Ok(Decision {
            analysis_id: features.analysis_id.clone(),
            score,
            label,
            reasons,
            outcomes,
            learned_hits: learned_app.hits,
            learned_delta: learned_app.delta,
            learned_snapshot_version: learned.version,
            events: trail.into_events(),
        })
    }

    fn admit_doc<'a>(
        &self,
        doc: &'a DocProfile,
        trail: &mut AuditTrail,
    ) -> VeritasResult<Cow<'a, DocProfile>> {
        match self.gate.admit(doc) {
            Ok(()) => Ok(Cow::Borrowed(doc)),
            Err(err) => self.fail_safe(err, trail).map(|()| Cow::Owned(DocProfile::unknown())),
        }
    }

    fn admit_geo<'a>(
        &self,
        geo: &'a GeoEvidence,
        trail: &mut AuditTrail,
    ) -> VeritasResult<Cow<'a, GeoEvidence>> {
        match geo.profile.invariant_violation(self.geo_unknown_floor) {
            None => Ok(Cow::Borrowed(geo)),
            Some(detail) => {
                let err = ConsistencyError::NonCanonicalGeoProfile {
                    component: "rule_engine".to_string(),
                    detail,
                };
                self.fail_safe(err, trail).map(|()| Cow::Owned(GeoEvidence::unknown()))
            }
        }
    }

    /// Strict mode surfaces the violation; otherwise it is recorded and evaluation
    /// continues on the UNKNOWN value.
    fn fail_safe(&self, err: ConsistencyError, trail: &mut AuditTrail) -> VeritasResult<()> {
        if self.rules_config.strict_consistency {
            return Err(VeritasError::ConsistencyError(err));
        }
        tracing::warn!(error = %err, "non-canonical profile replaced with UNKNOWN");
        trail.info(
            AuditSource::RuleEngine,
            AuditCategory::Consistency,
            "CONSISTENCY_FAIL_SAFE",
            err.to_string(),
            json!({ "replaced_with": "UNKNOWN" }),
        );
        Ok(())
    }
}

/// Run one rule, turning errors and panics into a fault reason.
fn run_isolated(
    rule: &dyn Rule,
    ctx: &RuleContext<'_>,
) -> Result<Option<Finding>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(Ok(finding)) => Ok(finding),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
