use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(VAT_NUMBER, r"\bFR\s?[0-9A-Z]{2}\s?\d{9}\b");
geo_pattern!(SIRET, r"(?i)\bSIRE[NT]\b");
geo_pattern!(TVA, r"(?i)\bTVA\b");
geo_pattern!(PHONE, r"\+33\s?\d");
geo_pattern!(EURO, r"(?:€\s?\d|\d\s?€|\bEUR\b)");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "fr_vat_number", regex: &VAT_NUMBER, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "fr_siret", regex: &SIRET, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "fr_tva_keyword", regex: &TVA, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "fr_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "euro_symbol", regex: &EURO, weight: 1.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
