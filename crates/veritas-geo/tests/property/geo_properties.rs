//! Property tests for geography inference.

use proptest::prelude::*;
use veritas_core::config::GeoConfig;
use veritas_geo::GeoConsistencyMatrix;

const FRAGMENTS: &[&str] = &[
    "Seattle, WA 98101",
    "(206) 555-0100",
    "Sales tax",
    "$4.20",
    "Toronto ON M5V 2T6",
    "HST 13%",
    "VAT Reg GB 123 4567 89",
    "£3.10",
    "MwSt 19%",
    "DE123456789",
    "12,50 €",
    "TVA 20%",
    "ABN 51 824 753 556",
    "Sydney NSW 2000",
    "GSTIN 29ABCDE1234F1Z5",
    "CGST 9%",
    "₹450",
    "Total 12.00",
    "Thank you",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..8).prop_map(|parts| parts.join("\n"))
}

proptest! {
    #[test]
    fn unknown_always_has_zero_confidence(text in document()) {
        let inference = GeoConsistencyMatrix::default().infer(&text, None);
        if inference.profile.is_unknown() {
            prop_assert_eq!(inference.profile.confidence(), 0.0);
        } else {
            prop_assert!(inference.profile.confidence() >= GeoConfig::default().unknown_floor);
        }
        prop_assert!(inference.profile.invariant_violation(GeoConfig::default().unknown_floor).is_none());
    }

    #[test]
    fn confidence_stays_in_unit_interval(text in document()) {
        let inference = GeoConsistencyMatrix::default().infer(&text, None);
        prop_assert!((0.0..=1.0).contains(&inference.profile.confidence()));
        prop_assert!((0.0..=1.0).contains(&inference.diagnostics.raw_confidence));
    }

    #[test]
    fn inference_is_deterministic(text in document()) {
        let matrix = GeoConsistencyMatrix::default();
        prop_assert_eq!(matrix.infer(&text, None), matrix.infer(&text, None));
    }

    #[test]
    fn known_winner_meets_minimum_score(text in document()) {
        let inference = GeoConsistencyMatrix::default().infer(&text, None);
        if !inference.profile.is_unknown() {
            prop_assert!(inference.diagnostics.raw_score >= GeoConfig::default().min_winner_score);
            prop_assert_eq!(inference.diagnostics.raw_winner, inference.profile.country());
        }
    }
}
