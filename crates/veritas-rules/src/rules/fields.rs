//! Field-presence rules. All four are document-aware.

use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;
use crate::gate::Field;

pub struct MissingAmount;

impl Rule for MissingAmount {
    fn id(&self) -> &'static str {
        "fields.missing_amount"
    }

    fn code(&self) -> &'static str {
        "MISSING_AMOUNT"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.15
    }

    fn field(&self) -> Option<Field> {
        Some(Field::Amount)
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let f = ctx.features;
        if !f.amounts.is_empty() || !f.line_items.is_empty() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            "no amounts detected",
            json!({ "family": ctx.doc.family(), "subtype": ctx.doc.subtype() }),
        )))
    }
}

pub struct MissingTotal;

impl Rule for MissingTotal {
    fn id(&self) -> &'static str {
        "fields.missing_total"
    }

    fn code(&self) -> &'static str {
        "MISSING_TOTAL"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.15
    }

    fn field(&self) -> Option<Field> {
        Some(Field::Total)
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let f = ctx.features;
        if f.amounts.is_empty() || f.total().is_some() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            "amounts present but none labelled total",
            json!({ "amounts": f.amounts.len() }),
        )))
    }
}

pub struct MissingDate;

impl Rule for MissingDate {
    fn id(&self) -> &'static str {
        "fields.missing_date"
    }

    fn code(&self) -> &'static str {
        "MISSING_DATE"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.10
    }

    fn field(&self) -> Option<Field> {
        Some(Field::Date)
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let present = ctx
            .features
            .document_date
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());
        Ok((!present).then(|| Finding::new("no document date", json!({}))))
    }
}

pub struct MissingMerchant;

impl Rule for MissingMerchant {
    fn id(&self) -> &'static str {
        "fields.missing_merchant"
    }

    fn code(&self) -> &'static str {
        "MISSING_MERCHANT"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.10
    }

    fn field(&self) -> Option<Field> {
        Some(Field::Merchant)
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        Ok(ctx
            .features
            .merchant_name()
            .is_none()
            .then(|| Finding::new("no merchant", json!({}))))
    }
}
