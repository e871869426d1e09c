use veritas_core::errors::*;

#[test]
fn engine_timeout_carries_engine_and_budget() {
    let err = EngineError::TimedOut {
        engine: "vision".into(),
        timeout_ms: 2000,
    };
    let msg = err.to_string();
    assert!(msg.contains("vision"));
    assert!(msg.contains("2000"));
    assert_eq!(err.engine(), Some("vision"));
}

#[test]
fn worker_pool_error_has_no_engine() {
    let err = EngineError::WorkerPool {
        reason: "closed".into(),
    };
    assert_eq!(err.engine(), None);
}

#[test]
fn rule_fault_carries_rule_id() {
    let err = VeritasError::RuleFault {
        rule_id: "dates.after_capture".into(),
        reason: "boom".into(),
    };
    assert!(err.to_string().contains("dates.after_capture"));
}

// --- From impls ---

#[test]
fn engine_error_converts_to_veritas_error() {
    let err: VeritasError = EngineError::Unavailable {
        engine: "extractor".into(),
        reason: "503".into(),
    }
    .into();
    assert!(matches!(err, VeritasError::EngineError(_)));
    assert!(err.to_string().contains("503"));
}

#[test]
fn consistency_error_converts_to_veritas_error() {
    let err: VeritasError = ConsistencyError::NonCanonicalGeoProfile {
        component: "rule_engine".into(),
        detail: "UNKNOWN country carries confidence 0.4".into(),
    }
    .into();
    assert!(matches!(err, VeritasError::ConsistencyError(_)));
}

#[test]
fn learning_error_converts_to_veritas_error() {
    let err: VeritasError = LearningError::DuplicatePattern {
        pattern_id: "merchant:acme".into(),
    }
    .into();
    assert!(err.to_string().contains("merchant:acme"));
}

#[test]
fn serde_error_converts_to_veritas_error() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: VeritasError = serde_err.into();
    assert!(matches!(err, VeritasError::SerializationError(_)));
}
