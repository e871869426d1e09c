//! End-to-end analyses through DecisionPipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use veritas_core::config::VeritasConfig;
use veritas_core::errors::{EngineError, VeritasError, VeritasResult};
use veritas_core::models::{
    DecisionPath, DocProfile, EngineOutput, EngineRole, EngineStatus, EngineTier, FeatureSet,
    FinalLabel, Label, RawConfidence, RecommendedAction, Severity,
};
use veritas_core::traits::IVerdictEngine;
use veritas_pipeline::{AnalysisRequest, DecisionPipeline};
use veritas_rules::{Finding, Rule, RuleContext, RuleEngine};

struct ScriptedEngine {
    name: &'static str,
    role: EngineRole,
    tag: &'static str,
    confidence: RawConfidence,
    delay: Duration,
}

impl ScriptedEngine {
    fn new(name: &'static str, role: EngineRole, tag: &'static str, confidence: RawConfidence) -> Self {
        Self {
            name,
            role,
            tag,
            confidence,
            delay: Duration::from_millis(1),
        }
    }

    fn hung(name: &'static str, role: EngineRole) -> Self {
        Self {
            delay: Duration::from_millis(1_500),
            ..Self::new(name, role, "clean", RawConfidence::Number(0.9))
        }
    }
}

impl IVerdictEngine for ScriptedEngine {
    fn name(&self) -> &str {
        self.name
    }
    fn tier(&self) -> EngineTier {
        EngineTier::ModelBacked
    }
    fn role(&self) -> EngineRole {
        self.role
    }
    fn assess(&self, _features: &FeatureSet) -> Result<EngineOutput, EngineError> {
        std::thread::sleep(self.delay);
        Ok(EngineOutput::Verdict {
            tag: self.tag.to_string(),
            confidence: self.confidence.clone(),
            observations: vec![],
        })
    }
}

const VETO: EngineRole = EngineRole {
    critical: false,
    veto_capable: true,
};
const CRITICAL: EngineRole = EngineRole {
    critical: true,
    veto_capable: true,
};

fn scenario_request(name: &str) -> AnalysisRequest {
    let scenario = test_fixtures::golden_scenarios()
        .into_iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no golden scenario {name}"));
    AnalysisRequest::new(scenario.features).with_hints(scenario.hints)
}

fn config_with_override(engine: &str, timeout_ms: u64) -> VeritasConfig {
    let mut config = VeritasConfig::default();
    config.engines.timeout_overrides_ms.insert(engine.to_string(), timeout_ms);
    config
}

#[tokio::test]
async fn golden_scenarios_without_engines() {
    for scenario in test_fixtures::golden_scenarios() {
        let pipeline = DecisionPipeline::new(VeritasConfig::default()).unwrap();
        if !scenario.learned_rules.is_empty() {
            pipeline.learned_store().publish(scenario.learned_rules.clone()).unwrap();
        }
        let request = AnalysisRequest::new(scenario.features.clone()).with_hints(scenario.hints.clone());
        let report = pipeline
            .analyze(request)
            .await
            .unwrap_or_else(|e| panic!("{}: {e}", scenario.name));

        assert_eq!(report.decision.label, scenario.expected.label, "{}", scenario.name);
        for code in &scenario.expected.fired {
            assert!(report.decision.fired(code), "{}: expected {code}", scenario.name);
        }
        let expected_final = match scenario.expected.label {
            Label::Real => FinalLabel::Real,
            Label::Suspicious => FinalLabel::NeedsHumanReview,
            Label::Fake => FinalLabel::Fake,
        };
        assert_eq!(report.final_label, expected_final, "{}", scenario.name);
        assert!(report.verdicts.is_empty());
        assert_eq!(
            report.events_with_code(report.decision_path.code()).count(),
            1,
            "{}: one reconciliation event",
            scenario.name
        );
    }
}

#[tokio::test]
async fn template_tool_is_rejected_even_with_a_clean_engine() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default())
        .unwrap()
        .with_engines(vec![Arc::new(ScriptedEngine::new(
            "visual_integrity",
            VETO,
            "clean",
            RawConfidence::Text("very high".to_string()),
        ))]);
    let report = pipeline.analyze(scenario_request("template_tool")).await.unwrap();
    assert_eq!(report.final_label, FinalLabel::Fake);
    assert_eq!(report.decision_path, DecisionPath::HardFail);
    assert_eq!(report.recommended_action, RecommendedAction::Reject);
}

/// A rule that makes any document suspicious without a CRITICAL outcome.
struct Murky;

impl Rule for Murky {
    fn id(&self) -> &'static str {
        "test.murky"
    }
    fn code(&self) -> &'static str {
        "TEST_MURKY"
    }
    fn severity(&self) -> Severity {
        Severity::Info
    }
    fn contribution(&self) -> f64 {
        0.45
    }
    fn evaluate(&self, _ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        Ok(Some(Finding::new("murky", serde_json::json!({}))))
    }
}

#[tokio::test]
async fn suspicious_rules_with_clean_high_confidence_engine_become_real() {
    let config = VeritasConfig::default();
    let pipeline = DecisionPipeline::new(config.clone())
        .unwrap()
        .with_rule_engine(RuleEngine::with_rules(&config, vec![Box::new(Murky)]))
        .with_engines(vec![Arc::new(ScriptedEngine::new(
            "visual_integrity",
            VETO,
            "clean",
            RawConfidence::Text("very high".to_string()),
        ))]);

    let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
    assert_eq!(report.decision.label, Label::Suspicious);
    assert!((report.decision.score - 0.45).abs() < 1e-9);
    assert_eq!(report.decision_path, DecisionPath::RuleWeighted);
    assert_eq!(report.final_label, FinalLabel::Real);
    assert!(report.final_confidence >= 0.75, "confidence {}", report.final_confidence);
    assert_eq!(report.agreement, Some(1.0));
}

#[tokio::test]
async fn critical_engine_timeout_is_incomplete() {
    let pipeline = DecisionPipeline::new(config_with_override("visual_integrity", 30))
        .unwrap()
        .with_engines(vec![Arc::new(ScriptedEngine::hung("visual_integrity", CRITICAL))]);

    let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
    assert_eq!(report.final_label, FinalLabel::Incomplete);
    assert_eq!(report.recommended_action, RecommendedAction::RetryOrReview);
    assert_eq!(report.decision_path, DecisionPath::CriticalEngineMissing);
    assert_eq!(report.verdicts[0].status, EngineStatus::TimedOut);

    let timed_out: Vec<_> = report.events_with_code("ENGINE_TIMED_OUT").collect();
    assert_eq!(timed_out.len(), 1);
    assert_eq!(timed_out[0].severity, Severity::Critical);
    assert_eq!(pipeline.degraded_engines(), vec!["visual_integrity".to_string()]);
}

#[tokio::test]
async fn hung_optional_engine_degrades_within_its_timeout() {
    let pipeline = DecisionPipeline::new(config_with_override("slow_ocr", 50))
        .unwrap()
        .with_engines(vec![
            Arc::new(ScriptedEngine::hung("slow_ocr", EngineRole::OPTIONAL)),
            Arc::new(ScriptedEngine::new("visual_integrity", VETO, "clean", RawConfidence::Number(92.0))),
        ]);

    let started = Instant::now();
    let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(1_000));

    assert_ne!(report.final_label, FinalLabel::Incomplete);
    assert_eq!(report.final_label, FinalLabel::Real);
    assert_eq!(report.reconciliation.inputs.missing_optional, vec!["slow_ocr".to_string()]);
    assert_eq!(report.events_with_code("OPTIONAL_ENGINE_ABSENT").count(), 1);
    let names: Vec<&str> = report.verdicts.iter().map(|v| v.engine.as_str()).collect();
    assert_eq!(names, vec!["slow_ocr", "visual_integrity"]);

    let metrics = pipeline.metrics();
    assert_eq!(metrics.analyses, 1);
    assert_eq!(metrics.engine_timeouts, 1);
}

#[tokio::test]
async fn hung_optional_engine_never_starves_the_critical_engine_across_analyses() {
    let mut config = config_with_override("slow_ocr", 50);
    config.engines.timeout_overrides_ms.insert("core".to_string(), 300);
    config.engines.worker_pool_size = 2;
    let pipeline = DecisionPipeline::new(config).unwrap().with_engines(vec![
        Arc::new(ScriptedEngine::hung("slow_ocr", EngineRole::OPTIONAL)),
        Arc::new(ScriptedEngine::new("core", CRITICAL, "clean", RawConfidence::Number(0.9))),
    ]);

    // Every abandoned slow_ocr call keeps an optional permit past its timeout.
    for run in 0..3 {
        let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
        assert_eq!(report.verdicts[1].status, EngineStatus::Completed, "run {run}");
        assert_ne!(report.final_label, FinalLabel::Incomplete, "run {run}");
        assert_eq!(report.final_label, FinalLabel::Real, "run {run}");
        assert_eq!(report.reconciliation.inputs.missing_optional, vec!["slow_ocr".to_string()]);
    }
    assert_eq!(pipeline.metrics().engine_timeouts, 3);
}

#[tokio::test]
async fn confident_fraud_veto_flips_a_clean_document() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default())
        .unwrap()
        .with_engines(vec![Arc::new(ScriptedEngine::new(
            "visual_integrity",
            VETO,
            "tampered",
            RawConfidence::Number(0.9),
        ))]);
    let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
    assert_eq!(report.decision.label, Label::Real);
    assert_eq!(report.decision_path, DecisionPath::ExternalVeto);
    assert_eq!(report.final_label, FinalLabel::Fake);
    assert!((report.final_confidence - (0.6 + 0.35 * 0.9)).abs() < 1e-9);
}

#[tokio::test]
async fn audit_sequence_is_continuous_across_stages() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default())
        .unwrap()
        .with_engines(vec![Arc::new(ScriptedEngine::new(
            "visual_integrity",
            VETO,
            "clean",
            RawConfidence::Text("pretty sure".to_string()),
        ))]);
    let report = pipeline.analyze(scenario_request("currency_mismatch")).await.unwrap();

    for (i, event) in report.events.iter().enumerate() {
        assert_eq!(event.seq as usize, i);
        assert_eq!(event.id, format!("{}:{:04}", report.analysis_id, i));
    }
    assert_eq!(report.events_with_code("CONFIDENCE_FALLBACK").count(), 1);
    assert_eq!(report.events.last().map(|e| e.code.as_str()), Some(report.decision_path.code()));
}

#[tokio::test]
async fn published_learned_rules_reach_the_next_analysis() {
    let scenario = test_fixtures::golden_scenarios()
        .into_iter()
        .find(|s| s.name == "learned_merchant")
        .unwrap();
    let pipeline = DecisionPipeline::new(VeritasConfig::default()).unwrap();

    let before = pipeline
        .analyze(AnalysisRequest::new(scenario.features.clone()).with_hints(scenario.hints.clone()))
        .await
        .unwrap();
    assert_eq!(before.learned_snapshot_version, 0);
    assert!(before.decision.learned_hits.is_empty());

    let version = pipeline.learned_store().publish(scenario.learned_rules.clone()).unwrap();
    let after = pipeline
        .analyze(AnalysisRequest::new(scenario.features).with_hints(scenario.hints))
        .await
        .unwrap();
    assert_eq!(after.learned_snapshot_version, version);
    assert_eq!(after.decision.learned_hits.len(), 1);
    assert!(after.decision.score > before.decision.score);
}

#[test]
fn rules_only_evaluation_matches_the_full_analysis() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default()).unwrap();
    let request = scenario_request("inflated_total");
    let decision = pipeline.evaluate_rules(&request).unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let report = runtime.block_on(pipeline.analyze(request)).unwrap();
    assert_eq!(report.decision, decision);
}

#[tokio::test]
async fn report_serializes_to_flat_json() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default()).unwrap();
    let report = pipeline.analyze(scenario_request("clean_receipt")).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["final_label"], "real");
    assert_eq!(json["recommended_action"], "accept");
    assert_eq!(json["decision_path"], "rule_weighted");
    assert_eq!(json["doc_profile"]["family"], "RECEIPT");
    assert!(json["events"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn non_canonical_profiles_fail_safe_or_fail_strict() {
    let broken: DocProfile = serde_json::from_value(serde_json::json!({
        "family": "RECEIPT",
        "subtype": "AIR_WAYBILL",
        "confidence": 0.9,
        "evidence": []
    }))
    .unwrap();

    let lenient = DecisionPipeline::new(VeritasConfig::default()).unwrap();
    let report = lenient
        .analyze(scenario_request("clean_receipt").with_doc_profile(broken.clone()))
        .await
        .unwrap();
    assert_eq!(report.doc_profile, DocProfile::unknown());
    assert_eq!(report.events_with_code("CONSISTENCY_FAIL_SAFE").count(), 1);

    let mut config = VeritasConfig::default();
    config.rules.strict_consistency = true;
    let strict = DecisionPipeline::new(config).unwrap();
    let err = strict
        .analyze(scenario_request("clean_receipt").with_doc_profile(broken))
        .await
        .unwrap_err();
    assert!(matches!(err, VeritasError::ConsistencyError(_)));
}

#[tokio::test]
async fn invalid_input_and_config_are_rejected() {
    let pipeline = DecisionPipeline::new(VeritasConfig::default()).unwrap();
    let mut request = scenario_request("clean_receipt");
    request.features.analysis_id = String::new();
    assert!(matches!(
        pipeline.analyze(request).await,
        Err(VeritasError::InvalidInput { .. })
    ));

    let mut config = VeritasConfig::default();
    config.thresholds.suspicious_at = 0.9;
    assert!(matches!(DecisionPipeline::new(config), Err(VeritasError::ConfigError(_))));
}
