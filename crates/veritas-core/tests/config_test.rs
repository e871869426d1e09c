use veritas_core::config::*;
use veritas_core::errors::VeritasError;
use veritas_core::models::EngineTier;

#[test]
fn defaults_match_documented_values() {
    let config = VeritasConfig::default();
    assert_eq!(config.thresholds.suspicious_at, 0.30);
    assert_eq!(config.thresholds.fake_at, 0.60);
    assert_eq!(config.geo.unknown_floor, 0.30);
    assert_eq!(config.geo.no_strong_signal_cap, 0.25);
    assert_eq!(config.document_gate.min_confidence, 0.55);
    assert_eq!(config.learned.low_confidence_clamp, 0.05);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_toml_overrides_only_named_keys() {
    let config = VeritasConfig::from_toml_str(
        r#"
        [thresholds]
        fake_at = 0.7

        [engines]
        worker_pool_size = 2

        [engines.timeout_overrides_ms]
        vision = 1500
        "#,
    )
    .unwrap();
    assert_eq!(config.thresholds.fake_at, 0.7);
    assert_eq!(config.thresholds.suspicious_at, 0.30);
    assert_eq!(config.engines.worker_pool_size, 2);
    assert_eq!(
        config.engines.timeout_for("vision", EngineTier::LargeModel).as_millis(),
        1500
    );
    assert_eq!(
        config.engines.timeout_for("other", EngineTier::ModelBacked).as_millis(),
        10_000
    );
}

#[test]
fn inverted_thresholds_rejected() {
    let err = VeritasConfig::from_toml_str(
        r#"
        [thresholds]
        suspicious_at = 0.7
        fake_at = 0.6
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, VeritasError::ConfigError(_)));
}

#[test]
fn out_of_range_fraction_rejected() {
    let err = VeritasConfig::from_toml_str("[geo]\nunknown_floor = 1.5\n").unwrap_err();
    assert!(err.to_string().contains("geo.unknown_floor"));
}

#[test]
fn zero_worker_pool_rejected() {
    let mut config = VeritasConfig::default();
    config.engines.worker_pool_size = 0;
    assert!(config.validate().is_err());

    let mut config = VeritasConfig::default();
    config.engines.critical_pool_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let err = VeritasConfig::from_toml_str("[thresholds\nfake_at = ").unwrap_err();
    assert!(matches!(err, VeritasError::TomlError(_)));
}

#[test]
fn config_round_trips_through_toml() {
    let config = VeritasConfig::default();
    let text = toml::to_string(&config).unwrap();
    let parsed = VeritasConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.ensemble.veto_threshold, config.ensemble.veto_threshold);
}
