//! Alert thresholds: >3 degradations of one engine in 1 hour is a warning,
//! the same engine degraded for >24h is critical.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

const WARNING_WINDOW_HOURS: i64 = 1;
const WARNING_COUNT: usize = 3;
const CRITICAL_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub engine: String,
    pub message: String,
}

/// Evaluate alerts as of now.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    evaluate_alerts_at(tracker, Utc::now())
}

/// Evaluate alerts as of `now`. At most one alert per engine, the most severe.
pub fn evaluate_alerts_at(tracker: &DegradationTracker, now: DateTime<Utc>) -> Vec<DegradationAlert> {
    let engines: BTreeSet<&str> = tracker.events().iter().map(|t| t.event.engine.as_str()).collect();
    let mut alerts = Vec::new();

    for engine in engines {
        if let Some(duration) = tracker.degraded_duration(engine, now) {
            if duration > Duration::hours(CRITICAL_AFTER_HOURS) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    engine: engine.to_string(),
                    message: format!("{engine} has been degraded for over {CRITICAL_AFTER_HOURS} hours"),
                });
                continue;
            }
        }

        let recent = tracker.count_recent(engine, Duration::hours(WARNING_WINDOW_HOURS), now);
        if recent > WARNING_COUNT {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                engine: engine.to_string(),
                message: format!("{engine} has {recent} degradation events in the last hour"),
            });
        }
    }

    alerts
}
