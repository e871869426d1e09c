//! Decision metrics: outcome counts and engine health across analyses.

use std::collections::BTreeMap;

use serde::Serialize;
use veritas_core::models::{DecisionPath, EngineStatus, EngineVerdict, FinalLabel};

/// Running counters over completed analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionMetrics {
    pub analyses: u64,
    /// Keyed by final label, e.g. "needs_human_review".
    pub by_label: BTreeMap<String, u64>,
    /// Keyed by decision path code, e.g. "RECON_RULE_WEIGHTED".
    pub by_path: BTreeMap<String, u64>,
    /// Analyses with at least one HARD_FAIL outcome.
    pub hard_fails: u64,
    pub engine_timeouts: u64,
    pub engine_unavailable: u64,
    confidence_sum: f64,
}

impl DecisionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished analysis.
    pub fn record(
        &mut self,
        label: FinalLabel,
        path: DecisionPath,
        confidence: f64,
        hard_fail: bool,
        verdicts: &[EngineVerdict],
    ) {
        self.analyses += 1;
        *self.by_label.entry(label.as_str().to_string()).or_default() += 1;
        *self.by_path.entry(path.code().to_string()).or_default() += 1;
        if hard_fail {
            self.hard_fails += 1;
        }
        for verdict in verdicts {
            match verdict.status {
                EngineStatus::TimedOut => self.engine_timeouts += 1,
                EngineStatus::Unavailable => self.engine_unavailable += 1,
                EngineStatus::Completed => {}
            }
        }
        if confidence.is_finite() {
            self.confidence_sum += confidence;
        }
    }

    pub fn label_count(&self, label: FinalLabel) -> u64 {
        self.by_label.get(label.as_str()).copied().unwrap_or(0)
    }

    pub fn path_count(&self, path: DecisionPath) -> u64 {
        self.by_path.get(path.code()).copied().unwrap_or(0)
    }

    /// Mean final confidence, 0.0 before any analysis.
    pub fn average_confidence(&self) -> f64 {
        if self.analyses == 0 {
            0.0
        } else {
            self.confidence_sum / self.analyses as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
