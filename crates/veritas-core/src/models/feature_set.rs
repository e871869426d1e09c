use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized input for one analysis.
///
/// Created once upstream from recognition/extraction output and read-only here.
/// Classification guesses live in [`super::ClassificationHints`], never on this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub analysis_id: String,
    /// When the document was captured. Also the reference clock for audit events.
    pub received_at: DateTime<Utc>,
    /// Full recognized text.
    pub text: String,
    pub merchant: Option<String>,
    #[serde(default)]
    pub amounts: Vec<DetectedAmount>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Document date exactly as recognized. Parsed by the date rules.
    pub document_date: Option<String>,
    /// ISO-4217 currency code.
    pub currency: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl FeatureSet {
    /// Minimal feature set carrying only text.
    pub fn new(analysis_id: impl Into<String>, received_at: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            received_at,
            text: text.into(),
            merchant: None,
            amounts: Vec::new(),
            line_items: Vec::new(),
            document_date: None,
            currency: None,
            postal_code: None,
            metadata: DocumentMetadata::default(),
        }
    }

    /// The first amount labelled as the total.
    pub fn total(&self) -> Option<f64> {
        self.amount_labelled(AmountLabel::Total)
    }

    pub fn subtotal(&self) -> Option<f64> {
        self.amount_labelled(AmountLabel::Subtotal)
    }

    pub fn tax(&self) -> Option<f64> {
        self.amount_labelled(AmountLabel::Tax)
    }

    fn amount_labelled(&self, label: AmountLabel) -> Option<f64> {
        self.amounts
            .iter()
            .find(|a| a.label == label && a.value.is_finite())
            .map(|a| a.value)
    }

    /// Merchant name with surrounding whitespace removed; `None` when blank.
    pub fn merchant_name(&self) -> Option<&str> {
        self.merchant
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Upper-cased currency code, if any.
    pub fn currency_code(&self) -> Option<String> {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_uppercase)
    }
}

/// A monetary amount found in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAmount {
    pub value: f64,
    pub label: AmountLabel,
    /// The token as recognized, e.g. "$1,234.50".
    #[serde(default)]
    pub raw: String,
}

impl DetectedAmount {
    pub fn new(value: f64, label: AmountLabel) -> Self {
        Self {
            value,
            label,
            raw: format!("{value:.2}"),
        }
    }
}

/// What an amount represents on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountLabel {
    Total,
    Subtotal,
    Tax,
    LineItem,
    Other,
}

/// One purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: f64,
}

/// File-level metadata reported by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub creator_tool: Option<String>,
    pub producer: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Free-form flags raised upstream (e.g. "screenshot", "multiple_fonts").
    #[serde(default)]
    pub flags: Vec<String>,
}

impl DocumentMetadata {
    /// Creator tool and producer, lower-cased, skipping absent values.
    pub fn tool_names(&self) -> impl Iterator<Item = String> + '_ {
        [self.creator_tool.as_deref(), self.producer.as_deref()]
            .into_iter()
            .flatten()
            .map(|s| s.to_lowercase())
    }
}
