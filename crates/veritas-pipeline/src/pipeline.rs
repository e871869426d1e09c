//! DecisionPipeline: the single entry point wiring every component.
//!
//! ```text
//! FeatureSet ─┬─> GeoConsistencyMatrix ─┐
//!             └─> DocProfile (once) ────┴─> RuleEngine (+ learned snapshot) ─> Decision
//!                                                                               │
//! EngineOrchestrator ─> ConfidenceNormalizer ─> EngineVerdicts ─────────────────┤
//!                                                                               v
//!                                                  EnsembleReconciler ─> AnalysisReport
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::Instrument;
use veritas_core::audit::AuditTrail;
use veritas_core::config::VeritasConfig;
use veritas_core::errors::{EngineError, VeritasResult};
use veritas_core::models::{
    ClassificationHints, Decision, DocProfile, EngineStatus, EngineVerdict, FeatureSet,
};
use veritas_core::traits::{IMerchantDirectory, IPostalDirectory, IVerdictEngine};
use veritas_ensemble::{verdicts_from_runs, ConfidenceNormalizer, EngineOrchestrator, EnsembleReconciler};
use veritas_geo::{GeoAssessment, GeoConsistencyMatrix};
use veritas_learning::LearnedRuleStore;
use veritas_observability::degradation::{evaluate_alerts, DegradationAlert, DegradationTracker, EngineDegradation};
use veritas_observability::tracing_setup::events;
use veritas_observability::DecisionMetrics;
use veritas_rules::RuleEngine;

use crate::report::AnalysisReport;
use crate::request::AnalysisRequest;

/// Output of the synchronous stage.
struct RuleStage {
    doc: DocProfile,
    geo: GeoAssessment,
    decision: Decision,
}

pub struct DecisionPipeline {
    config: VeritasConfig,
    geo: GeoConsistencyMatrix,
    rules: RuleEngine,
    learned: Arc<LearnedRuleStore>,
    orchestrator: EngineOrchestrator,
    normalizer: ConfidenceNormalizer,
    reconciler: EnsembleReconciler,
    metrics: Mutex<DecisionMetrics>,
    degradation: Mutex<DegradationTracker>,
}

impl DecisionPipeline {
    /// Pipeline with the built-in rule catalogue, an empty learned store and no engines.
    pub fn new(config: VeritasConfig) -> VeritasResult<Self> {
        config.validate()?;
        Ok(Self {
            geo: GeoConsistencyMatrix::new(config.geo.clone()),
            rules: RuleEngine::new(&config),
            learned: Arc::new(LearnedRuleStore::new(config.learned.clone())),
            orchestrator: EngineOrchestrator::new(config.engines.clone()),
            normalizer: ConfidenceNormalizer::new(),
            reconciler: EnsembleReconciler::new(&config),
            metrics: Mutex::new(DecisionMetrics::new()),
            degradation: Mutex::new(DegradationTracker::new()),
            config,
        })
    }

    pub fn with_engines(mut self, engines: Vec<Arc<dyn IVerdictEngine>>) -> Self {
        self.orchestrator = EngineOrchestrator::with_engines(self.config.engines.clone(), engines);
        self
    }

    pub fn register_engine(&mut self, engine: Arc<dyn IVerdictEngine>) {
        self.orchestrator.register(engine);
    }

    /// Share a store with a feedback loop that publishes into it.
    pub fn with_learned_store(mut self, store: Arc<LearnedRuleStore>) -> Self {
        self.learned = store;
        self
    }

    /// Replace the rule engine, e.g. to run a custom catalogue.
    pub fn with_rule_engine(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_merchant_directory(mut self, directory: Arc<dyn IMerchantDirectory>) -> Self {
        self.rules = self.rules.with_merchant_directory(directory);
        self
    }

    pub fn with_postal_directory(mut self, directory: Arc<dyn IPostalDirectory>) -> Self {
        self.rules = self.rules.with_postal_directory(directory);
        self
    }

    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    pub fn learned_store(&self) -> Arc<LearnedRuleStore> {
        Arc::clone(&self.learned)
    }

    pub fn engine_roster(&self) -> Vec<String> {
        self.orchestrator.roster()
    }

    /// Rules-only analysis: no engines, no reconciliation.
    pub fn evaluate_rules(&self, request: &AnalysisRequest) -> VeritasResult<Decision> {
        request.validate()?;
        Ok(self.rule_stage(&request.features, &request.hints, request.finalize_doc_profile())?.decision)
    }

    /// Full analysis.
    ///
    /// Errors only on invalid input or, under `strict_consistency`, on a
    /// non-canonical profile. Engine failures degrade the result instead.
    pub async fn analyze(&self, request: AnalysisRequest) -> VeritasResult<AnalysisReport> {
        request.validate()?;
        let span = veritas_observability::analysis_span!(request.features.analysis_id);
        self.analyze_inner(request).instrument(span).await
    }

    async fn analyze_inner(&self, request: AnalysisRequest) -> VeritasResult<AnalysisReport> {
        let doc = request.finalize_doc_profile();
        let AnalysisRequest { features, hints, .. } = request;

        let RuleStage { doc, geo, decision } = self.rule_stage(&features, &hints, doc)?;

        let features = Arc::new(features);
        let runs = self
            .orchestrator
            .run(Arc::clone(&features))
            .instrument(veritas_observability::engines_span!(
                features.analysis_id,
                self.orchestrator.engine_count()
            ))
            .await;

        let mut trail = AuditTrail::resume(
            features.analysis_id.clone(),
            features.received_at,
            decision.events.clone(),
        );
        let verdicts = verdicts_from_runs(&runs, &features, &self.normalizer, &mut trail);
        for (run, verdict) in runs.iter().zip(&verdicts) {
            if let Err(EngineError::TimedOut { timeout_ms, .. }) = &run.result {
                events::engine_timed_out(&verdict.engine, *timeout_ms, verdict.role.critical);
            } else if verdict.status == EngineStatus::Unavailable {
                events::engine_unavailable(
                    &verdict.engine,
                    verdict.error.as_deref().unwrap_or("unavailable"),
                    verdict.role.critical,
                );
            }
        }
        self.track_degradation(&verdicts);

        let reconciliation = self.reconciler.reconcile(&decision, &verdicts, &mut trail);

        events::decision_reached(
            &features.analysis_id,
            reconciliation.label.as_str(),
            reconciliation.path.code(),
            reconciliation.confidence,
            decision.score,
        );
        lock(&self.metrics).record(
            reconciliation.label,
            reconciliation.path,
            reconciliation.confidence,
            decision.has_hard_fail(),
            &verdicts,
        );

        Ok(AnalysisReport {
            analysis_id: features.analysis_id.clone(),
            final_label: reconciliation.label,
            final_confidence: reconciliation.confidence,
            recommended_action: reconciliation.action,
            decision_path: reconciliation.path,
            agreement: reconciliation.agreement,
            learned_snapshot_version: decision.learned_snapshot_version,
            decision,
            verdicts,
            reconciliation: reconciliation.event,
            events: trail.into_events(),
            doc_profile: doc,
            geo_profile: geo.evidence.profile,
            geo_diagnostics: geo.diagnostics,
        })
    }

    fn rule_stage(
        &self,
        features: &FeatureSet,
        hints: &ClassificationHints,
        doc: DocProfile,
    ) -> VeritasResult<RuleStage> {
        let geo = self.geo.assess(features, hints);
        let snapshot = self.learned.snapshot();
        let decision = {
            let _span =
                veritas_observability::rule_evaluation_span!(features.analysis_id, snapshot.version).entered();
            self.rules.evaluate(features, &geo.evidence, &doc, &snapshot)?
        };

        for outcome in &decision.outcomes {
            events::rule_fired(
                &decision.analysis_id,
                &outcome.code,
                outcome.severity.as_str(),
                outcome.contribution,
            );
        }
        for skipped in decision.events.iter().filter(|e| e.code == "RULE_SKIPPED") {
            let rule = skipped.evidence["rule"].as_str().unwrap_or_default();
            events::gate_skipped(&decision.analysis_id, rule, &skipped.message);
        }

        // The rule engine falls back to UNKNOWN for a non-canonical profile.
        let doc = if doc.invariant_violation().is_some() {
            DocProfile::unknown()
        } else {
            doc
        };
        Ok(RuleStage { doc, geo, decision })
    }

    fn track_degradation(&self, verdicts: &[EngineVerdict]) {
        let now = Utc::now();
        let mut tracker = lock(&self.degradation);
        for verdict in verdicts {
            match verdict.status {
                EngineStatus::Completed => {
                    tracker.mark_recovered(&verdict.engine, now);
                }
                EngineStatus::TimedOut | EngineStatus::Unavailable => {
                    let fallback = if verdict.role.critical {
                        "analysis marked incomplete"
                    } else {
                        "excluded from reconciliation"
                    };
                    tracker.record(EngineDegradation::new(
                        verdict.engine.clone(),
                        verdict.error.clone().unwrap_or_else(|| format!("{:?}", verdict.status)),
                        fallback,
                        now,
                    ));
                }
            }
        }
    }

    /// Snapshot of decision metrics so far.
    pub fn metrics(&self) -> DecisionMetrics {
        lock(&self.metrics).clone()
    }

    /// Current engine degradation alerts.
    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&lock(&self.degradation))
    }

    /// Engines with an unrecovered degradation.
    pub fn degraded_engines(&self) -> Vec<String> {
        let tracker = lock(&self.degradation);
        let mut engines: Vec<String> = tracker
            .active_degradations()
            .into_iter()
            .map(|t| t.event.engine.clone())
            .collect();
        engines.sort();
        engines.dedup();
        engines
    }
}

/// Poisoned telemetry locks keep their last counters.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
