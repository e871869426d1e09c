//! Reference data: which countries use which currency and tax regime.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use veritas_core::models::Country;

/// ISO-4217 codes and the supported countries that issue in them.
const CURRENCY_TABLE: &[(&str, &[Country])] = &[
    ("USD", &[Country::US]),
    ("CAD", &[Country::CA]),
    ("GBP", &[Country::GB]),
    ("EUR", &[Country::DE, Country::FR]),
    ("AUD", &[Country::AU]),
    ("INR", &[Country::IN]),
];

/// Countries whose documents are expected in `currency`. `None` when the code is not
/// in the table.
pub fn currency_regions(currency: &str) -> Option<&'static [Country]> {
    let code = currency.trim().to_ascii_uppercase();
    CURRENCY_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, regions)| *regions)
}

/// Consumption tax regimes recognizable from document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// US state and local sales tax.
    SalesTax,
    /// Goods and services tax without a regional split.
    Gst,
    /// Canadian harmonized or provincial tax.
    CanadianProvincial,
    /// Indian split GST (CGST/SGST/IGST).
    IndianSplitGst,
    /// Value added tax labelled in English.
    Vat,
    /// German Mehrwertsteuer / Umsatzsteuer.
    GermanVat,
    /// French TVA.
    FrenchVat,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesTax => "sales_tax",
            Self::Gst => "gst",
            Self::CanadianProvincial => "canadian_provincial",
            Self::IndianSplitGst => "indian_split_gst",
            Self::Vat => "vat",
            Self::GermanVat => "german_vat",
            Self::FrenchVat => "french_vat",
        }
    }

    /// Countries where this regime is levied.
    pub fn regions(&self) -> &'static [Country] {
        match self {
            Self::SalesTax => &[Country::US],
            Self::Gst => &[Country::CA, Country::AU, Country::IN],
            Self::CanadianProvincial => &[Country::CA],
            Self::IndianSplitGst => &[Country::IN],
            Self::Vat => &[Country::GB, Country::DE, Country::FR],
            Self::GermanVat => &[Country::DE],
            Self::FrenchVat => &[Country::FR],
        }
    }
}

static SALES_TAX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:sales|state|county|city)\s+tax\b").ok());
static GST: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\bGST\b").ok());
static CANADIAN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:HST|PST|QST|TVQ)\b").ok());
static INDIAN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:CGST|SGST|IGST|UTGST)\b").ok());
static VAT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\bVAT\b").ok());
static GERMAN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:MwSt|USt|Mehrwertsteuer|Umsatzsteuer)\b").ok()
});
static FRENCH: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\bTVA\b").ok());

/// Every tax regime mentioned in `text`, in enum order.
pub fn detect_tax_regimes(text: &str) -> Vec<TaxRegime> {
    let table: [(TaxRegime, &LazyLock<Option<Regex>>); 7] = [
        (TaxRegime::SalesTax, &SALES_TAX),
        (TaxRegime::Gst, &GST),
        (TaxRegime::CanadianProvincial, &CANADIAN),
        (TaxRegime::IndianSplitGst, &INDIAN),
        (TaxRegime::Vat, &VAT),
        (TaxRegime::GermanVat, &GERMAN),
        (TaxRegime::FrenchVat, &FRENCH),
    ];
    table
        .into_iter()
        .filter(|(_, re)| is_match(re, text))
        .map(|(regime, _)| regime)
        .collect()
}

fn is_match(regex: &LazyLock<Option<Regex>>, text: &str) -> bool {
    let Some(re) = regex.as_ref() else { return false };
    re.is_match(text)
}

static CROSS_BORDER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:exchange\s+rate|foreign\s+(?:transaction|currency)|currency\s+conversion|fx\s+rate|duty[\s-]free|tax[\s-]free\s+shopping)\b",
    )
    .ok()
});

/// Explicit cross-border markers found in `text`, lowercased and deduplicated.
pub fn cross_border_markers(text: &str) -> Vec<String> {
    let Some(re) = CROSS_BORDER.as_ref() else {
        return Vec::new();
    };
    let mut markers: Vec<String> = re
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    markers.sort();
    markers.dedup();
    markers
}
