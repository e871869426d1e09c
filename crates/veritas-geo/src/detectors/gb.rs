use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(VAT_NUMBER, r"\bGB\s?\d{3}\s?\d{4}\s?\d{2}\b");
geo_pattern!(POSTCODE, r"\b[A-Z]{1,2}\d[A-Z\d]?\s\d[A-Z]{2}\b");
geo_pattern!(PHONE, r"\+44\s?(?:\(0\)\s?)?\d");
geo_pattern!(POUND, r"£\s?\d");
geo_pattern!(VAT, r"(?i)\bVAT\b");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "gb_vat_number", regex: &VAT_NUMBER, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "gb_postcode", regex: &POSTCODE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "gb_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "pound_symbol", regex: &POUND, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "vat_keyword", regex: &VAT, weight: 1.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
