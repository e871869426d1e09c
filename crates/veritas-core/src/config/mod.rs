pub mod defaults;
mod engine_config;
mod ensemble_config;
mod gate_config;
mod geo_config;
mod learned_config;
mod observability_config;
mod rules_config;
mod thresholds_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use engine_config::EngineConfig;
pub use ensemble_config::EnsembleConfig;
pub use gate_config::DocumentGateConfig;
pub use geo_config::GeoConfig;
pub use learned_config::LearnedConfig;
pub use observability_config::ObservabilityConfig;
pub use rules_config::RulesConfig;
pub use thresholds_config::ThresholdsConfig;

use crate::errors::{VeritasError, VeritasResult};

/// Top-level configuration aggregating every subsystem section.
///
/// Every section is `#[serde(default)]`, so a TOML file only needs the keys it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeritasConfig {
    pub thresholds: ThresholdsConfig,
    pub geo: GeoConfig,
    pub document_gate: DocumentGateConfig,
    pub learned: LearnedConfig,
    pub rules: RulesConfig,
    pub ensemble: EnsembleConfig,
    pub engines: EngineConfig,
    pub observability: ObservabilityConfig,
}

impl VeritasConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> VeritasResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> VeritasResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject configurations whose thresholds cannot produce sensible decisions.
    pub fn validate(&self) -> VeritasResult<()> {
        let fractions = [
            ("thresholds.suspicious_at", self.thresholds.suspicious_at),
            ("thresholds.fake_at", self.thresholds.fake_at),
            ("geo.unknown_floor", self.geo.unknown_floor),
            ("geo.no_strong_signal_cap", self.geo.no_strong_signal_cap),
            ("geo.low_confidence_cutoff", self.geo.low_confidence_cutoff),
            ("geo.low_confidence_penalty", self.geo.low_confidence_penalty),
            ("geo.plausible_ratio", self.geo.plausible_ratio),
            ("document_gate.min_confidence", self.document_gate.min_confidence),
            (
                "document_gate.low_confidence_discount",
                self.document_gate.low_confidence_discount,
            ),
            ("learned.low_confidence_clamp", self.learned.low_confidence_clamp),
            ("learned.max_total_delta", self.learned.max_total_delta),
            ("learned.max_rule_delta", self.learned.max_rule_delta),
            ("ensemble.hard_fail_confidence", self.ensemble.hard_fail_confidence),
            ("ensemble.rule_fake_confidence", self.ensemble.rule_fake_confidence),
            ("ensemble.veto_threshold", self.ensemble.veto_threshold),
            ("ensemble.high_confidence", self.ensemble.high_confidence),
            ("ensemble.low_confidence", self.ensemble.low_confidence),
            ("ensemble.agreement_threshold", self.ensemble.agreement_threshold),
            ("ensemble.agreement_bonus", self.ensemble.agreement_bonus),
            (
                "ensemble.missing_optional_penalty",
                self.ensemble.missing_optional_penalty,
            ),
        ];
        for (key, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(VeritasError::ConfigError(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.thresholds.suspicious_at >= self.thresholds.fake_at {
            return Err(VeritasError::ConfigError(format!(
                "thresholds.suspicious_at ({}) must be below thresholds.fake_at ({})",
                self.thresholds.suspicious_at, self.thresholds.fake_at
            )));
        }
        if self.document_gate.low_confidence_discount <= 0.0 {
            return Err(VeritasError::ConfigError(
                "document_gate.low_confidence_discount must be greater than zero".to_string(),
            ));
        }
        if self.learned.low_confidence_clamp > self.learned.max_total_delta {
            return Err(VeritasError::ConfigError(
                "learned.low_confidence_clamp must not exceed learned.max_total_delta".to_string(),
            ));
        }
        if self.ensemble.low_confidence > self.ensemble.high_confidence {
            return Err(VeritasError::ConfigError(
                "ensemble.low_confidence must not exceed ensemble.high_confidence".to_string(),
            ));
        }
        if self.geo.denominator_floor <= 0.0 || self.geo.min_winner_score < 0.0 {
            return Err(VeritasError::ConfigError(
                "geo.denominator_floor must be positive and geo.min_winner_score non-negative"
                    .to_string(),
            ));
        }
        if self.engines.worker_pool_size == 0 || self.engines.critical_pool_size == 0 {
            return Err(VeritasError::ConfigError(
                "engines.worker_pool_size and engines.critical_pool_size must be at least 1"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
