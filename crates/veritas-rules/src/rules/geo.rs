//! Geography consistency rules. Inputs come from the geography matrix; these rules
//! only read the gated profile, never the raw pre-gate values.

use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;

fn geo_evidence(ctx: &RuleContext<'_>) -> serde_json::Value {
    json!({
        "country": ctx.geo.profile.country().as_str(),
        "confidence": ctx.geo.profile.confidence(),
        "cross_border": ctx.geo.cross_border,
    })
}

pub struct CurrencyMismatch;

impl Rule for CurrencyMismatch {
    fn id(&self) -> &'static str {
        "geo.currency"
    }

    fn code(&self) -> &'static str {
        "GEO_CURRENCY_MISMATCH"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.30
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let check = &ctx.geo.currency;
        if !check.is_mismatch() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            check.note.clone(),
            json!({ "check": check.to_evidence(), "geo": geo_evidence(ctx) }),
        )))
    }
}

pub struct TaxRegimeMismatch;

impl Rule for TaxRegimeMismatch {
    fn id(&self) -> &'static str {
        "geo.tax_regime"
    }

    fn code(&self) -> &'static str {
        "GEO_TAX_REGIME_MISMATCH"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.25
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let check = &ctx.geo.tax;
        if !check.is_mismatch() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            check.note.clone(),
            json!({ "check": check.to_evidence(), "geo": geo_evidence(ctx) }),
        )))
    }
}

/// The postal directory places the document's postal code in another country.
pub struct PostalRegionMismatch;

impl Rule for PostalRegionMismatch {
    fn id(&self) -> &'static str {
        "geo.postal_region"
    }

    fn code(&self) -> &'static str {
        "POSTAL_REGION_MISMATCH"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.15
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let country = ctx.geo.profile.country();
        if !country.is_known() || ctx.geo.cross_border {
            return Ok(None);
        }
        let Some(directory) = ctx.postal else {
            return Ok(None);
        };
        let code = ctx.features.postal_code.as_deref().map(str::trim);
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        let Some(record) = directory.lookup(code) else {
            return Ok(None);
        };
        if !record.country.is_known() || record.country == country {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!(
                "postal code {code} belongs to {}, document reads as {country}",
                record.country
            ),
            json!({
                "postal_code": code,
                "postal_country": record.country.as_str(),
                "locality": record.locality,
                "geo": geo_evidence(ctx),
            }),
        )))
    }
}
