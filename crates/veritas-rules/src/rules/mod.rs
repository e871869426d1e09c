//! Built-in rule catalogue.
//!
//! Every rule is a pure function of its [`RuleContext`]. A rule reports a [`Finding`]
//! when it fires; the engine turns findings into outcomes with the rule's code,
//! severity, and contribution.

pub mod arithmetic;
pub mod dates;
pub mod fields;
pub mod geo;
pub mod merchant;
pub mod metadata;

use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use crate::context::RuleContext;
use crate::gate::Field;

/// Why a rule fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub reason: String,
    pub evidence: serde_json::Value,
}

impl Finding {
    pub fn new(reason: impl Into<String>, evidence: serde_json::Value) -> Self {
        Self {
            reason: reason.into(),
            evidence,
        }
    }
}

/// A built-in rule.
pub trait Rule: Send + Sync {
    /// Catalogue id, e.g. `metadata.template_tool`.
    fn id(&self) -> &'static str;

    /// Stable outcome code, e.g. `META_TEMPLATE_TOOL`.
    fn code(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Score contribution when the rule fires.
    fn contribution(&self) -> f64;

    /// The field a document-aware rule checks for. Such rules go through the
    /// document-profile gate first.
    fn field(&self) -> Option<Field> {
        None
    }

    /// `Ok(None)` when the rule does not fire. An error is a rule fault.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>>;
}

/// The 20 built-in rules in evaluation order.
pub fn default_catalogue() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(metadata::TemplateTool),
        Box::new(metadata::ImageEditor),
        Box::new(metadata::ModifiedAfterCreation),
        Box::new(metadata::TamperFlags),
        Box::new(metadata::CaptureFlags),
        Box::new(fields::MissingAmount),
        Box::new(fields::MissingTotal),
        Box::new(fields::MissingDate),
        Box::new(fields::MissingMerchant),
        Box::new(arithmetic::LineItemsTotalMismatch),
        Box::new(arithmetic::TaxArithmeticMismatch),
        Box::new(arithmetic::RoundTotal),
        Box::new(dates::DateUnparsable),
        Box::new(dates::DateAfterCapture),
        Box::new(dates::DateGap),
        Box::new(merchant::LooksLikeLabel),
        Box::new(merchant::NotInDirectory),
        Box::new(geo::CurrencyMismatch),
        Box::new(geo::TaxRegimeMismatch),
        Box::new(geo::PostalRegionMismatch),
    ]
}
