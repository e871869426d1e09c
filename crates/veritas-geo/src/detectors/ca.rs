use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(BUSINESS_NUMBER, r"\b\d{9}\s?RT\s?\d{4}\b");
geo_pattern!(POSTAL, r"\b[ABCEGHJ-NPRSTVXY]\d[ABCEGHJ-NPRSTV-Z]\s?\d[ABCEGHJ-NPRSTV-Z]\d\b");
geo_pattern!(PROVINCIAL_TAX, r"\b(?:HST|PST|QST|TVQ)\b");
geo_pattern!(GST, r"\bGST\b");
geo_pattern!(DOLLAR, r"(?:C\$|CA\$|\$)\s?\d");
geo_pattern!(CURRENCY_CODE, r"\bCAD\b");
geo_pattern!(COUNTRY_NAME, r"(?i)\bCanada\b");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "ca_business_number", regex: &BUSINESS_NUMBER, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "ca_postal_code", regex: &POSTAL, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "ca_provincial_tax", regex: &PROVINCIAL_TAX, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "gst_keyword", regex: &GST, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "dollar_symbol", regex: &DOLLAR, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "ca_currency_code", regex: &CURRENCY_CODE, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "ca_country_name", regex: &COUNTRY_NAME, weight: 2.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
