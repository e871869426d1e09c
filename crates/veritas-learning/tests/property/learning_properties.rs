use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use veritas_core::audit::AuditTrail;
use veritas_core::config::LearnedConfig;
use veritas_core::models::{FeatureSet, Severity};
use veritas_learning::{apply, AnalystLabel, FeedbackLearner, FeedbackRecord, LearnedRuleStore};

const MERCHANTS: &[&str] = &["Quick Mart", "Harbor Books", "Sunset Liquor", "Corner Deli"];
const TOOLS: &[&str] = &["Canva", "Excel", "Word"];

fn record(i: usize, merchant: usize, tool: Option<usize>, fraud: bool) -> FeedbackRecord {
    FeedbackRecord {
        analysis_id: format!("fb-{i}"),
        label: if fraud { AnalystLabel::Fraud } else { AnalystLabel::Genuine },
        merchant: Some(MERCHANTS[merchant].to_string()),
        creator_tool: tool.map(|t| TOOLS[t].to_string()),
        currency: Some("USD".to_string()),
        fired_codes: vec![],
        recorded_at: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    }
}

fn feedback() -> impl Strategy<Value = Vec<(usize, Option<usize>, bool)>> {
    prop::collection::vec(
        (0..MERCHANTS.len(), prop::option::of(0..TOOLS.len()), any::<bool>()),
        0..40,
    )
}

proptest! {
    #[test]
    fn proposals_are_always_publishable(entries in feedback()) {
        let config = LearnedConfig::default();
        let mut learner = FeedbackLearner::new(config.clone());
        for (i, (merchant, tool, fraud)) in entries.iter().enumerate() {
            learner.record(&record(i, *merchant, *tool, *fraud));
        }

        for rule in learner.proposals() {
            prop_assert!(rule.delta.abs() <= config.max_rule_delta);
            prop_assert_eq!(rule.severity, Severity::Info);
            prop_assert_eq!(rule.enabled, rule.observations >= config.min_observations);
        }

        let store = LearnedRuleStore::new(config);
        let version = learner.publish_to(&store);
        prop_assert_eq!(version, Ok(1));
    }

    #[test]
    fn applied_delta_respects_the_clamp(entries in feedback(), merchant in 0..MERCHANTS.len(), low in any::<bool>()) {
        let config = LearnedConfig::default();
        let mut learner = FeedbackLearner::new(config.clone());
        for (i, (m, tool, fraud)) in entries.iter().enumerate() {
            learner.record(&record(i, *m, *tool, *fraud));
        }
        let store = LearnedRuleStore::new(config.clone());
        prop_assert!(learner.publish_to(&store).is_ok());

        let at = Utc.with_ymd_and_hms(2026, 4, 2, 0, 0, 0).unwrap();
        let mut doc = FeatureSet::new("prop", at, MERCHANTS[merchant]);
        doc.merchant = Some(MERCHANTS[merchant].to_string());
        let mut trail = AuditTrail::new("prop", at);
        let app = apply(&store.snapshot(), &doc, 1.0, low, &config, &mut trail);

        let bound = if low { config.low_confidence_clamp } else { config.max_total_delta };
        prop_assert!(app.delta.abs() <= bound + 1e-12);
        prop_assert_eq!(trail.len(), app.hits.len());
    }
}
