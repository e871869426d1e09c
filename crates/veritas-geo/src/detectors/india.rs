use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(GSTIN, r"\b\d{2}[A-Z]{5}\d{4}[A-Z][1-9A-Z]Z[0-9A-Z]\b");
geo_pattern!(SPLIT_GST, r"\b(?:CGST|SGST|IGST|UTGST)\b");
geo_pattern!(PHONE, r"\+91[\s-]?\d");
geo_pattern!(RUPEE, r"(?:₹\s?\d|\bRs\.?\s?\d|\bINR\b)");
geo_pattern!(PIN_CODE, r"(?i)\b(?:PIN|Pincode)?:?\s?[1-9]\d{5}\b");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "in_gstin", regex: &GSTIN, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "in_split_gst", regex: &SPLIT_GST, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "in_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "rupee_symbol", regex: &RUPEE, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "in_pin_code", regex: &PIN_CODE, weight: 1.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
