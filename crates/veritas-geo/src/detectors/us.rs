use super::{scan, SignalHit, SignalPattern, Strength};

geo_pattern!(EIN, r"\b\d{2}-\d{7}\b");
geo_pattern!(PHONE, r"\(\d{3}\)\s?\d{3}-\d{4}\b");
geo_pattern!(
    STATE_ZIP,
    r"\b(?:AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY|DC),?\s+\d{5}(?:-\d{4})?\b"
);
geo_pattern!(SALES_TAX, r"(?i)\bsales\s+tax\b");
geo_pattern!(DOLLAR, r"\$\s?\d");
geo_pattern!(COUNTRY_NAME, r"(?i)\b(?:USA|U\.S\.A\.|United States)\b");

pub(super) static PATTERNS: &[SignalPattern] = &[
    SignalPattern { name: "us_ein", regex: &EIN, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "us_phone", regex: &PHONE, weight: 2.0, strength: Strength::Strong },
    SignalPattern { name: "us_state_zip", regex: &STATE_ZIP, weight: 3.0, strength: Strength::Strong },
    SignalPattern { name: "us_sales_tax", regex: &SALES_TAX, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "dollar_symbol", regex: &DOLLAR, weight: 1.0, strength: Strength::Weak },
    SignalPattern { name: "us_country_name", regex: &COUNTRY_NAME, weight: 2.0, strength: Strength::Weak },
];

pub(super) fn detect(text: &str) -> Vec<SignalHit> {
    scan(text, PATTERNS)
}
