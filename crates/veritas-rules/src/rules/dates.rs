//! Document date rules.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;

/// Date formats tried in order. Month-first precedes day-first, so an ambiguous
/// `03/04/2026` reads as March 4.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a document date string. `None` when no known format matches.
pub fn parse_document_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// The document date if present and parsable.
fn document_date(ctx: &RuleContext<'_>) -> Option<(String, NaiveDate)> {
    let raw = ctx.features.document_date.as_deref()?.trim();
    parse_document_date(raw).map(|date| (raw.to_string(), date))
}

/// A date is present but matches no known format.
pub struct DateUnparsable;

impl Rule for DateUnparsable {
    fn id(&self) -> &'static str {
        "dates.unparsable"
    }

    fn code(&self) -> &'static str {
        "DATE_UNPARSABLE"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.05
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some(raw) = ctx.features.document_date.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() || parse_document_date(raw).is_some() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("document date '{raw}' could not be parsed"),
            json!({ "raw": raw }),
        )))
    }
}

/// Document dated after it was captured.
pub struct DateAfterCapture;

impl Rule for DateAfterCapture {
    fn id(&self) -> &'static str {
        "dates.after_capture"
    }

    fn code(&self) -> &'static str {
        "DATE_AFTER_CAPTURE"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.30
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some((raw, date)) = document_date(ctx) else {
            return Ok(None);
        };
        let Some(start_of_day) = date.and_hms_opt(0, 0, 0) else {
            return Ok(None);
        };
        let dated = start_of_day.and_utc();
        let received: DateTime<Utc> = ctx.features.received_at;
        let limit = received + Duration::hours(ctx.config.capture_grace_hours);
        if dated <= limit {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("document dated {date} after capture on {}", received.date_naive()),
            json!({
                "raw": raw,
                "document_date": date.to_string(),
                "received_at": received.to_rfc3339(),
                "grace_hours": ctx.config.capture_grace_hours,
            }),
        )))
    }
}

/// Document date far older than the capture date.
pub struct DateGap;

impl Rule for DateGap {
    fn id(&self) -> &'static str {
        "dates.gap"
    }

    fn code(&self) -> &'static str {
        "DATE_GAP"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.10
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some((raw, date)) = document_date(ctx) else {
            return Ok(None);
        };
        let gap_days = (ctx.features.received_at.date_naive() - date).num_days();
        if gap_days <= ctx.config.date_gap_days {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("document dated {gap_days} days before capture"),
            json!({
                "raw": raw,
                "document_date": date.to_string(),
                "gap_days": gap_days,
                "max_gap_days": ctx.config.date_gap_days,
            }),
        )))
    }
}
