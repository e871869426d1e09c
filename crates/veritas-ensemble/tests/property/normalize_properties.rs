//! Property tests for confidence normalization.

use proptest::prelude::*;
use veritas_core::models::RawConfidence;
use veritas_ensemble::ConfidenceNormalizer;

fn raw_confidence() -> impl Strategy<Value = RawConfidence> {
    prop_oneof![
        any::<f64>().prop_map(RawConfidence::Number),
        (-50.0f64..150.0).prop_map(RawConfidence::Number),
        "[a-z _-]{0,12}".prop_map(RawConfidence::Text),
        (0u32..200).prop_map(|n| RawConfidence::Text(format!("{n}%"))),
        (-2.0f64..2.0).prop_map(|v| RawConfidence::Text(format!("{v:.3}"))),
        Just(RawConfidence::Missing),
    ]
}

proptest! {
    #[test]
    fn output_is_in_unit_interval(raw in raw_confidence()) {
        let value = ConfidenceNormalizer::new().normalize(&raw);
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn normalization_is_idempotent(raw in raw_confidence()) {
        let n = ConfidenceNormalizer::new();
        let once = n.normalize(&raw);
        prop_assert_eq!(n.normalize(&RawConfidence::Number(once)), once);
        prop_assert_eq!(n.normalize_number(once), once);
    }

    #[test]
    fn fallback_is_always_explained(raw in raw_confidence()) {
        let detailed = ConfidenceNormalizer::new().normalize_detailed(&raw);
        prop_assert_eq!(detailed.used_fallback(), detailed.note.is_some());
    }
}
