use chrono::{DateTime, Utc};

use super::{AuditCategory, AuditEvent, AuditSource};
use crate::models::Severity;

/// Append-only event log for one analysis.
///
/// Event ids derive from the analysis id and a sequence number, and every event is
/// stamped with the trail's reference time, so identical inputs yield identical trails.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    analysis_id: String,
    at: DateTime<Utc>,
    events: Vec<AuditEvent>,
}

impl AuditTrail {
    pub fn new(analysis_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            at,
            events: Vec::new(),
        }
    }

    /// Continue a trail from previously emitted events.
    pub fn resume(analysis_id: impl Into<String>, at: DateTime<Utc>, events: Vec<AuditEvent>) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            at,
            events,
        }
    }

    /// Append an event and return a reference to it.
    pub fn record(
        &mut self,
        source: AuditSource,
        category: AuditCategory,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        evidence: serde_json::Value,
    ) -> &AuditEvent {
        let seq = self.next_seq();
        self.events.push(AuditEvent {
            id: format!("{}:{:04}", self.analysis_id, seq),
            seq,
            timestamp: self.at,
            source,
            category,
            severity,
            code: code.into(),
            message: message.into(),
            evidence,
        });
        &self.events[self.events.len() - 1]
    }

    /// Shorthand for an INFO event.
    pub fn info(
        &mut self,
        source: AuditSource,
        category: AuditCategory,
        code: impl Into<String>,
        message: impl Into<String>,
        evidence: serde_json::Value,
    ) -> &AuditEvent {
        self.record(source, category, Severity::Info, code, message, evidence)
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events carrying the given code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a AuditEvent> + 'a {
        self.events.iter().filter(move |e| e.code == code)
    }

    pub fn into_events(self) -> Vec<AuditEvent> {
        self.events
    }

    fn next_seq(&self) -> u32 {
        self.events.last().map(|e| e.seq + 1).unwrap_or(0)
    }
}
