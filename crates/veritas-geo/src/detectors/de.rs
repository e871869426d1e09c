use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(VAT_NUMBER, r"\bDE\s?\d{9}\b");
geo_pattern!(TAX_KEYWORD, r"(?i)\b(?:MwSt|USt|Mehrwertsteuer|Umsatzsteuer)\b");
geo_pattern!(PHONE, r"\+49\s?\d");
geo_pattern!(STEUERNUMMER, r"(?i)\bSt\.?-?Nr\.?");
geo_pattern!(EURO, r"(?:€\s?\d|\d\s?€|\bEUR\b)");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "de_vat_number", regex: &VAT_NUMBER, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "de_tax_keyword", regex: &TAX_KEYWORD, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "de_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "de_tax_number", regex: &STEUERNUMMER, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "euro_symbol", regex: &EURO, weight: 1.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
