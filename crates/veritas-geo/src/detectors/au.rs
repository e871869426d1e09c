use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(ABN, r"(?i)\bABN:?\s?\d{2}\s?\d{3}\s?\d{3}\s?\d{3}\b");
geo_pattern!(STATE_POSTCODE, r"\b(?:NSW|VIC|QLD|WA|SA|TAS|ACT|NT)\s+\d{4}\b");
geo_pattern!(PHONE, r"\+61\s?\d");
geo_pattern!(GST, r"\bGST\b");
geo_pattern!(DOLLAR, r"(?:A\$|AU\$|\$)\s?\d");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "au_abn", regex: &ABN, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "au_state_postcode", regex: &STATE_POSTCODE, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "au_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "gst_keyword", regex: &GST, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "dollar_symbol", regex: &DOLLAR, weight: 1.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
