//! Record every engine degradation: engine, failure, fallback used, timestamp, recovery status.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One engine failing to deliver a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDegradation {
    pub engine: String,
    /// e.g. "timed out after 10000 ms".
    pub failure: String,
    /// What the decision did instead, e.g. "excluded from reconciliation".
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl EngineDegradation {
    pub fn new(
        engine: impl Into<String>,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            engine: engine.into(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp,
        }
    }
}

/// Recovery status of a degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: EngineDegradation,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks engine degradations for alerting and reporting.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: EngineDegradation) {
        tracing::warn!(
            event = "engine_degraded",
            engine = %event.engine,
            failure = %event.failure,
            fallback = %event.fallback_used,
            "engine degraded"
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of `engine` as recovered.
    ///
    /// Returns how many were closed.
    pub fn mark_recovered(&mut self, engine: &str, at: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.engine == engine && tracked.recovery_status == RecoveryStatus::Active {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(at);
                closed += 1;
            }
        }
        if closed > 0 {
            tracing::info!(event = "engine_recovered", engine = %engine, closed, "engine recovered");
        }
        closed
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    /// Unrecovered degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, engine: &str) -> bool {
        self.events
            .iter()
            .any(|t| t.event.engine == engine && t.recovery_status == RecoveryStatus::Active)
    }

    /// Degradations of `engine` in the `window` before `now`.
    pub fn count_recent(&self, engine: &str, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|t| t.event.engine == engine && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `engine` has been continuously degraded as of `now`, or None
    /// if it is not degraded.
    pub fn degraded_duration(&self, engine: &str, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| t.event.engine == engine && t.recovery_status == RecoveryStatus::Active)
            .map(|t| t.event.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
