//! Merchant rules.

use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;

/// Strings an extractor sometimes mistakes for a merchant name.
const GENERIC_LABELS: &[&str] = &[
    "total",
    "subtotal",
    "sub total",
    "grand total",
    "receipt",
    "sales receipt",
    "invoice",
    "tax invoice",
    "bill",
    "amount",
    "amount due",
    "balance",
    "balance due",
    "cash",
    "change",
    "date",
    "tax",
    "vat",
    "gst",
    "thank you",
    "customer copy",
    "merchant copy",
    "store",
    "shop",
    "merchant",
    "payment",
    "order",
    "description",
    "qty",
];

/// Merchant field holds a generic label or no letters at all.
pub struct LooksLikeLabel;

impl Rule for LooksLikeLabel {
    fn id(&self) -> &'static str {
        "merchant.looks_like_label"
    }

    fn code(&self) -> &'static str {
        "MERCHANT_LOOKS_LIKE_LABEL"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.20
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some(merchant) = ctx.features.merchant_name() else {
            return Ok(None);
        };
        let normalized = merchant
            .trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
            .to_lowercase();

        let reason = if !merchant.chars().any(char::is_alphabetic) {
            "merchant has no letters"
        } else if GENERIC_LABELS.contains(&normalized.as_str()) {
            "merchant is a generic document label"
        } else {
            return Ok(None);
        };
        Ok(Some(Finding::new(
            format!("{reason}: '{merchant}'"),
            json!({ "merchant": merchant }),
        )))
    }
}

/// A merchant directory is configured and does not know the merchant.
pub struct NotInDirectory;

impl Rule for NotInDirectory {
    fn id(&self) -> &'static str {
        "merchant.not_in_directory"
    }

    fn code(&self) -> &'static str {
        "MERCHANT_NOT_IN_DIRECTORY"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.05
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some(directory) = ctx.merchants else {
            return Ok(None);
        };
        let Some(merchant) = ctx.features.merchant_name() else {
            return Ok(None);
        };
        if directory.lookup(merchant).is_some() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("merchant '{merchant}' not found in directory"),
            json!({ "merchant": merchant }),
        )))
    }
}
