//! ConfidenceNormalizer: maps heterogeneous engine confidence onto [0, 1].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use veritas_core::models::RawConfidence;

/// Value used when a representation is not understood.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Qualitative levels, matched after folding `_` and `-` to spaces.
const LEVELS: &[(&str, f64)] = &[
    ("very low", 0.10),
    ("very high", 0.95),
    ("moderate", 0.60),
    ("certain", 0.99),
    ("medium", 0.60),
    ("high", 0.85),
    ("low", 0.30),
];

static NUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+))\s*(%?)$").ok());

/// How a normalized value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationSource {
    Fraction,
    Percentage,
    Qualitative,
    NumericText,
    Fallback,
}

/// A normalized confidence plus how it was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub value: f64,
    pub source: NormalizationSource,
    /// Why the fallback was used, when it was.
    pub note: Option<String>,
}

impl Normalized {
    fn new(value: f64, source: NormalizationSource) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            source,
            note: None,
        }
    }

    fn fallback(note: impl Into<String>) -> Self {
        Self {
            value: FALLBACK_CONFIDENCE,
            source: NormalizationSource::Fallback,
            note: Some(note.into()),
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.source == NormalizationSource::Fallback
    }
}

/// Stateless confidence normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceNormalizer;

impl ConfidenceNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalized value in [0, 1].
    pub fn normalize(&self, raw: &RawConfidence) -> f64 {
        self.normalize_detailed(raw).value
    }

    /// Normalize a bare number. Idempotent on its own output.
    pub fn normalize_number(&self, value: f64) -> f64 {
        number(value).value
    }

    pub fn normalize_detailed(&self, raw: &RawConfidence) -> Normalized {
        match raw {
            RawConfidence::Number(value) => number(*value),
            RawConfidence::Text(text) => text_value(text),
            RawConfidence::Missing => Normalized::fallback("confidence missing"),
        }
    }
}

fn number(value: f64) -> Normalized {
    if value.is_nan() {
        Normalized::fallback("confidence is NaN")
    } else if value < 0.0 {
        Normalized::fallback(format!("negative confidence {value}"))
    } else if value <= 1.0 {
        Normalized::new(value, NormalizationSource::Fraction)
    } else if value <= 100.0 {
        Normalized::new(value / 100.0, NormalizationSource::Percentage)
    } else {
        Normalized::fallback(format!("confidence {value} above percentage scale"))
    }
}

fn text_value(text: &str) -> Normalized {
    let trimmed = text.trim().to_lowercase();

    if let Some(caps) = NUMERIC.as_ref().and_then(|re| re.captures(&trimmed)) {
        let parsed = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
        let percent = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
        return match parsed {
            Some(value) if percent => {
                if (0.0..=100.0).contains(&value) {
                    Normalized::new(value / 100.0, NormalizationSource::NumericText)
                } else {
                    Normalized::fallback(format!("percentage '{text}' out of range"))
                }
            }
            Some(value) => {
                let mut n = number(value);
                if !n.used_fallback() {
                    n.source = NormalizationSource::NumericText;
                }
                n
            }
            None => Normalized::fallback(format!("unparsable number '{text}'")),
        };
    }

    let level = trimmed
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match LEVELS.iter().find(|(name, _)| level == *name) {
        Some((_, value)) => Normalized::new(*value, NormalizationSource::Qualitative),
        None => Normalized::fallback(format!("unrecognized confidence '{text}'")),
    }
}
