//! Property tests for the rule engine: score bound, hard-fail precedence,
//! repeat-evaluation determinism.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use veritas_core::config::VeritasConfig;
use veritas_core::models::{
    AmountLabel, DetectedAmount, DocFamily, DocProfile, DocSubtype, FeatureSet, Label,
    LearnedPattern, LearnedRule, LearnedRuleSnapshot, LineItem, Severity,
};
use veritas_geo::GeoConsistencyMatrix;
use veritas_rules::RuleEngine;

const TOOLS: &[&str] = &["", "Canva", "Canvas PDF Export", "Adobe Photoshop", "ScanSnap", "GIMP 2.10", "Microsoft Word"];
const MERCHANTS: &[&str] = &["", "Total", "Receipt", "12345", "Blue Bottle Coffee", "Quick Mart"];
const DATES: &[&str] = &["", "2026-03-09", "2019-01-01", "2027-12-31", "31/31/2026", "Mar 04, 2026"];
const CURRENCIES: &[&str] = &["", "USD", "CAD", "EUR", "GBP", "XYZ"];
const TEXTS: &[&str] = &[
    "",
    "Seattle, WA 98101\n(206) 555-0100\nSales tax",
    "Toronto ON M5V 2T6\nHST 13%",
    "VAT Reg GB 123 4567 89\n£3.10",
    "exchange rate applied",
];

fn optional(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

prop_compose! {
    fn feature_set()(
        text in prop::sample::select(TEXTS),
        merchant in prop::sample::select(MERCHANTS),
        date in prop::sample::select(DATES),
        currency in prop::sample::select(CURRENCIES),
        tool in prop::sample::select(TOOLS),
        total in prop::option::of(0.0f64..5_000.0),
        subtotal in prop::option::of(0.0f64..5_000.0),
        tax in prop::option::of(0.0f64..500.0),
        items in prop::collection::vec(0.0f64..1_000.0, 0..5),
    ) -> FeatureSet {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let mut f = FeatureSet::new("prop", at, text);
        f.merchant = optional(merchant);
        f.document_date = optional(date);
        f.currency = optional(currency);
        f.metadata.creator_tool = optional(tool);
        for (value, label) in [
            (total, AmountLabel::Total),
            (subtotal, AmountLabel::Subtotal),
            (tax, AmountLabel::Tax),
        ] {
            if let Some(value) = value {
                f.amounts.push(DetectedAmount::new(value, label));
            }
        }
        f.line_items = items
            .into_iter()
            .enumerate()
            .map(|(i, amount)| LineItem { description: format!("item {i}"), amount })
            .collect();
        f
    }
}

fn doc_profile() -> impl Strategy<Value = DocProfile> {
    (
        prop::sample::select(vec![
            (DocFamily::Receipt, DocSubtype::PosReceipt),
            (DocFamily::Logistics, DocSubtype::AirWaybill),
            (DocFamily::Statement, DocSubtype::BankStatement),
            (DocFamily::Unknown, DocSubtype::Unknown),
        ]),
        0.0f64..=1.0,
    )
        .prop_map(|((family, subtype), confidence)| {
            DocProfile::canonical(family, subtype, confidence, vec![])
        })
}

fn snapshot() -> impl Strategy<Value = LearnedRuleSnapshot> {
    prop::collection::vec(-0.15f64..=0.15, 0..4).prop_map(|deltas| {
        let rules = deltas
            .into_iter()
            .enumerate()
            .map(|(i, delta)| LearnedRule {
                pattern_id: format!("prop-{i}"),
                pattern: LearnedPattern::TotalAbove(i as f64 * 100.0),
                delta,
                observations: 10,
                enabled: true,
                severity: Severity::Info,
                evidence: vec![],
            })
            .collect();
        LearnedRuleSnapshot::new(1, rules)
    })
}

proptest! {
    #[test]
    fn score_is_bounded(features in feature_set(), doc in doc_profile(), learned in snapshot()) {
        let engine = RuleEngine::new(&VeritasConfig::default());
        let geo = GeoConsistencyMatrix::default().assess(&features, &Default::default()).evidence;
        let decision = engine.evaluate(&features, &geo, &doc, &learned).unwrap();
        prop_assert!((0.0..=1.0).contains(&decision.score));
        prop_assert!(decision.learned_delta.abs() <= VeritasConfig::default().learned.max_total_delta + 1e-12);
    }

    #[test]
    fn hard_fail_forces_fake(features in feature_set(), doc in doc_profile()) {
        let engine = RuleEngine::new(&VeritasConfig::default());
        let geo = GeoConsistencyMatrix::default().assess(&features, &Default::default()).evidence;
        let decision = engine
            .evaluate(&features, &geo, &doc, &LearnedRuleSnapshot::default())
            .unwrap();
        if decision.has_hard_fail() {
            prop_assert_eq!(decision.label, Label::Fake);
        }
        if features.metadata.creator_tool.as_deref() == Some("Canva") {
            prop_assert!(decision.fired("META_TEMPLATE_TOOL"));
            prop_assert_eq!(decision.label, Label::Fake);
        }
        if features.metadata.creator_tool.as_deref() == Some("Canvas PDF Export") {
            prop_assert!(!decision.fired("META_TEMPLATE_TOOL"));
            prop_assert!(!decision.has_hard_fail());
        }
    }

    #[test]
    fn evaluation_is_deterministic(features in feature_set(), doc in doc_profile(), learned in snapshot()) {
        let engine = RuleEngine::new(&VeritasConfig::default());
        let geo = GeoConsistencyMatrix::default().assess(&features, &Default::default()).evidence;
        let first = engine.evaluate(&features, &geo, &doc, &learned).unwrap();
        let second = engine.evaluate(&features, &geo, &doc, &learned).unwrap();
        prop_assert_eq!(first, second);
    }
}
