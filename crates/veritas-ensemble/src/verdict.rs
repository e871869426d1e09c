//! Turning raw engine output into normalized [`EngineVerdict`]s.

use std::collections::BTreeMap;

use serde_json::json;
use veritas_core::audit::{AuditCategory, AuditSource, AuditTrail};
use veritas_core::errors::EngineError;
use veritas_core::models::{
    EngineOutput, EngineStatus, EngineVerdict, FeatureSet, Severity, VerdictTag,
};

use crate::normalize::{ConfidenceNormalizer, Normalized};
use crate::orchestrator::EngineRun;

/// Absolute tolerance when comparing an extracted total.
const TOTAL_TOLERANCE: f64 = 0.02;
/// Relative tolerance when comparing an extracted total.
const TOTAL_RELATIVE_TOLERANCE: f64 = 0.01;

/// A verdict plus what normalization had to do to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVerdict {
    pub verdict: EngineVerdict,
    /// Present only for completed runs.
    pub confidence: Option<Normalized>,
}

/// Normalize one engine run.
pub fn to_verdict(
    run: &EngineRun,
    features: &FeatureSet,
    normalizer: &ConfidenceNormalizer,
) -> NormalizedVerdict {
    let output = match &run.result {
        Ok(output) => output,
        Err(err) => {
            let status = match err {
                EngineError::TimedOut { .. } => EngineStatus::TimedOut,
                _ => EngineStatus::Unavailable,
            };
            return NormalizedVerdict {
                verdict: EngineVerdict::absent(&run.engine, run.role, status, err.to_string()),
                confidence: None,
            };
        }
    };

    let (tag, normalized, observations) = match output {
        EngineOutput::Verdict {
            tag,
            confidence,
            observations,
        } => (
            VerdictTag::parse(tag),
            normalizer.normalize_detailed(confidence),
            observations.clone(),
        ),
        EngineOutput::Extraction { fields, quality } => {
            let quality = normalizer.normalize_detailed(quality);
            let (tag, factor, observations) = corroborate_extraction(fields, features);
            let mut scaled = quality.clone();
            scaled.value = (quality.value * factor).clamp(0.0, 1.0);
            (tag, scaled, observations)
        }
    };

    NormalizedVerdict {
        verdict: EngineVerdict {
            engine: run.engine.clone(),
            role: run.role,
            status: EngineStatus::Completed,
            tag,
            confidence: normalized.value,
            observations,
            error: None,
        },
        confidence: Some(normalized),
    }
}

/// Compare extracted fields with the feature set.
///
/// Returns the derived tag, the factor applied to extraction quality, and
/// observations. A total that disagrees is fraud at half quality; a matching
/// total with no merchant disagreement is genuine; anything else is uncertain.
pub fn corroborate_extraction(
    fields: &BTreeMap<String, String>,
    features: &FeatureSet,
) -> (VerdictTag, f64, Vec<String>) {
    let mut observations = Vec::new();

    let total_matches = match (fields.get("total").and_then(|t| parse_amount(t)), features.total()) {
        (Some(extracted), Some(expected)) => {
            let tolerance = TOTAL_TOLERANCE.max(TOTAL_RELATIVE_TOLERANCE * expected.abs());
            let matches = (extracted - expected).abs() <= tolerance;
            observations.push(format!(
                "extracted total {extracted:.2} {} document total {expected:.2}",
                if matches { "matches" } else { "differs from" }
            ));
            Some(matches)
        }
        _ => {
            observations.push("total not comparable".to_string());
            None
        }
    };

    let merchant_matches = match (
        fields.get("merchant").map(|m| m.trim().to_lowercase()).filter(|m| !m.is_empty()),
        features.merchant_name().map(str::to_lowercase),
    ) {
        (Some(extracted), Some(expected)) => {
            let matches = extracted.contains(&expected) || expected.contains(&extracted);
            observations.push(format!(
                "extracted merchant '{extracted}' {} '{expected}'",
                if matches { "matches" } else { "differs from" }
            ));
            Some(matches)
        }
        _ => None,
    };

    match (total_matches, merchant_matches) {
        (Some(false), _) => (VerdictTag::Fraud, 0.5, observations),
        (Some(true), Some(false)) => (VerdictTag::Uncertain, 1.0, observations),
        (Some(true), _) => (VerdictTag::Genuine, 1.0, observations),
        (None, _) => (VerdictTag::Uncertain, 1.0, observations),
    }
}

/// Parse an amount such as "$1,234.50" or "1 234,50 €".
fn parse_amount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();
    if digits.is_empty() {
        return None;
    }
    // A trailing ",dd" is a decimal comma.
    let normalized = match digits.rfind(',') {
        Some(pos) if digits.len() - pos == 3 && !digits.contains('.') => {
            let mut s = digits.replace(',', "");
            s.insert(s.len() - 2, '.');
            s
        }
        _ => digits.replace(',', ""),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize every run in roster order, recording what happened on `trail`.
pub fn verdicts_from_runs(
    runs: &[EngineRun],
    features: &FeatureSet,
    normalizer: &ConfidenceNormalizer,
    trail: &mut AuditTrail,
) -> Vec<EngineVerdict> {
    runs.iter()
        .map(|run| {
            let normalized = to_verdict(run, features, normalizer);
            let v = &normalized.verdict;
            let timing = json!({
                "engine": v.engine,
                "tier": run.tier,
                "critical": v.role.critical,
                "veto_capable": v.role.veto_capable,
                "timeout_ms": run.timeout.as_millis() as u64,
                "elapsed_ms": run.elapsed.as_millis() as u64,
            });
            match v.status {
                EngineStatus::Completed => {
                    trail.info(
                        AuditSource::Orchestrator,
                        AuditCategory::Engine,
                        "ENGINE_COMPLETED",
                        format!("{} returned {} at {:.2}", v.engine, v.tag, v.confidence),
                        timing,
                    );
                }
                EngineStatus::TimedOut | EngineStatus::Unavailable => {
                    let (code, severity) = match (v.status, v.role.critical) {
                        (EngineStatus::TimedOut, true) => ("ENGINE_TIMED_OUT", Severity::Critical),
                        (EngineStatus::TimedOut, false) => ("ENGINE_TIMED_OUT", Severity::Info),
                        (_, true) => ("ENGINE_UNAVAILABLE", Severity::Critical),
                        (_, false) => ("ENGINE_UNAVAILABLE", Severity::Info),
                    };
                    trail.record(
                        AuditSource::Orchestrator,
                        AuditCategory::Engine,
                        severity,
                        code,
                        v.error.clone().unwrap_or_default(),
                        timing,
                    );
                }
            }
            if let Some(note) = normalized.confidence.as_ref().and_then(|n| n.note.as_ref()) {
                trail.info(
                    AuditSource::Normalizer,
                    AuditCategory::Normalization,
                    "CONFIDENCE_FALLBACK",
                    format!("{}: {note}; using {:.2}", v.engine, v.confidence),
                    json!({ "engine": v.engine, "note": note, "value": v.confidence }),
                );
            }
            normalized.verdict
        })
        .collect()
}
