use serde::{Deserialize, Serialize};
use std::fmt;

/// Countries the geography matrix can infer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    US,
    CA,
    GB,
    DE,
    FR,
    AU,
    IN,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::US => "US",
            Self::CA => "CA",
            Self::GB => "GB",
            Self::DE => "DE",
            Self::FR => "FR",
            Self::AU => "AU",
            Self::IN => "IN",
            Self::Unknown => crate::constants::UNKNOWN_COUNTRY,
        }
    }

    /// Parse an ISO-3166 alpha-2 code. Unrecognized codes are `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "US" => Self::US,
            "CA" => Self::CA,
            "GB" | "UK" => Self::GB,
            "DE" => Self::DE,
            "FR" => Self::FR,
            "AU" => Self::AU,
            "IN" => Self::IN,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical geography classification consumed by the consistency rules.
///
/// Invariant: a country other than `Unknown` always carries a confidence at or above
/// the UNKNOWN floor; `Unknown` always carries confidence 0. The raw pre-gate values
/// live in [`GeoDiagnostics`] and never travel on this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoProfile {
    country: Country,
    confidence: f64,
    evidence: Vec<String>,
}

impl GeoProfile {
    /// Gate an inferred winner through the UNKNOWN floor.
    pub fn gated(country: Country, confidence: f64, evidence: Vec<String>, unknown_floor: f64) -> Self {
        if !country.is_known() || !confidence.is_finite() || confidence < unknown_floor {
            return Self::unknown(evidence);
        }
        Self {
            country,
            confidence: confidence.min(1.0),
            evidence,
        }
    }

    pub fn unknown(evidence: Vec<String>) -> Self {
        Self {
            country: Country::Unknown,
            confidence: 0.0,
            evidence,
        }
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    pub fn is_unknown(&self) -> bool {
        !self.country.is_known()
    }

    /// Describe why this profile breaks the UNKNOWN invariant, if it does.
    pub fn invariant_violation(&self, unknown_floor: f64) -> Option<String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Some(format!("confidence {} outside [0, 1]", self.confidence));
        }
        match self.country {
            Country::Unknown if self.confidence != 0.0 => Some(format!(
                "UNKNOWN country carries confidence {}",
                self.confidence
            )),
            c if c.is_known() && self.confidence < unknown_floor => Some(format!(
                "country {} carries confidence {:.3} below floor {:.3}",
                c, self.confidence, unknown_floor
            )),
            _ => None,
        }
    }
}

/// Pre-gate inference values, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDiagnostics {
    /// Region with the highest raw score, before the UNKNOWN gate.
    pub raw_winner: Country,
    pub raw_score: f64,
    pub raw_confidence: f64,
    /// Raw score per region, highest first.
    pub region_scores: Vec<(Country, f64)>,
}
