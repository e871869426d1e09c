//! Cross-field arithmetic rules.

use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;

/// Line items that add up to neither the total nor the subtotal.
pub struct LineItemsTotalMismatch;

impl Rule for LineItemsTotalMismatch {
    fn id(&self) -> &'static str {
        "arithmetic.line_items_total"
    }

    fn code(&self) -> &'static str {
        "LINE_ITEMS_TOTAL_MISMATCH"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.25
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let f = ctx.features;
        if f.line_items.len() < 2 {
            return Ok(None);
        }
        let Some(total) = f.total() else {
            return Ok(None);
        };

        let sum: f64 = f.line_items.iter().map(|item| item.amount).sum();
        let tolerance = ctx.tolerance(total);
        let matches_total = (sum - total).abs() <= tolerance;
        let matches_subtotal = f
            .subtotal()
            .is_some_and(|subtotal| (sum - subtotal).abs() <= ctx.tolerance(subtotal));
        if matches_total || matches_subtotal {
            return Ok(None);
        }

        Ok(Some(Finding::new(
            format!("line items sum to {sum:.2} but total is {total:.2}"),
            json!({
                "line_item_count": f.line_items.len(),
                "line_item_sum": sum,
                "total": total,
                "subtotal": f.subtotal(),
                "tolerance": tolerance,
            }),
        )))
    }
}

/// Subtotal plus tax differs from the total.
pub struct TaxArithmeticMismatch;

impl Rule for TaxArithmeticMismatch {
    fn id(&self) -> &'static str {
        "arithmetic.tax"
    }

    fn code(&self) -> &'static str {
        "TAX_ARITHMETIC_MISMATCH"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.15
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let f = ctx.features;
        let (Some(subtotal), Some(tax), Some(total)) = (f.subtotal(), f.tax(), f.total()) else {
            return Ok(None);
        };
        let expected = subtotal + tax;
        let tolerance = ctx.tolerance(total);
        if (expected - total).abs() <= tolerance {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("subtotal {subtotal:.2} + tax {tax:.2} = {expected:.2}, total is {total:.2}"),
            json!({
                "subtotal": subtotal,
                "tax": tax,
                "expected_total": expected,
                "total": total,
                "tolerance": tolerance,
            }),
        )))
    }
}

/// Large totals that are exact multiples of ten and not backed by line items.
pub struct RoundTotal;

impl Rule for RoundTotal {
    fn id(&self) -> &'static str {
        "arithmetic.round_total"
    }

    fn code(&self) -> &'static str {
        "ROUND_TOTAL"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.05
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let Some(total) = ctx.features.total() else {
            return Ok(None);
        };
        if !total.is_finite() || total < ctx.config.round_total_minimum {
            return Ok(None);
        }
        let cents = (total * 100.0).round() as i64;
        if cents % 1_000 != 0 {
            return Ok(None);
        }
        let items = &ctx.features.line_items;
        if items.len() >= 2 {
            let sum: f64 = items.iter().map(|item| item.amount).sum();
            if (sum - total).abs() <= ctx.tolerance(total) {
                return Ok(None);
            }
        }
        Ok(Some(Finding::new(
            format!("total {total:.2} is a round amount"),
            json!({ "total": total, "minimum": ctx.config.round_total_minimum }),
        )))
    }
}
