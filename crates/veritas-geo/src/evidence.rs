use serde::{Deserialize, Serialize};
use veritas_core::models::{Country, GeoDiagnostics, GeoProfile};

use crate::detectors::SignalHit;

/// Result of `GeoConsistencyMatrix::infer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInference {
    pub profile: GeoProfile,
    pub diagnostics: GeoDiagnostics,
    /// Regions with a strong signal scoring close to the winner.
    pub plausible: Vec<Country>,
    /// Signal hits per region, in registry order. Regions without hits are omitted.
    pub hits: Vec<(Country, Vec<SignalHit>)>,
}

/// Outcome of checking one document attribute against the inferred country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Consistent,
    Mismatch,
    /// A mismatch that cross-border evidence explains away.
    SuppressedCrossBorder,
    /// Country unknown, attribute absent, or attribute not in the reference tables.
    Unverifiable,
}

/// Expected-vs-detected comparison for currency or tax regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    pub status: CheckStatus,
    /// The attribute value that was checked, e.g. `CAD` or `vat`.
    pub subject: Option<String>,
    /// Countries the attribute is compatible with.
    pub expected: Vec<Country>,
    /// Inferred country.
    pub detected: Country,
    pub note: String,
}

impl ConsistencyCheck {
    pub fn unverifiable(detected: Country, note: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Unverifiable,
            subject: None,
            expected: Vec::new(),
            detected,
            note: note.into(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        self.status == CheckStatus::Mismatch
    }

    /// Evidence payload for a rule outcome or audit event.
    pub fn to_evidence(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status,
            "subject": self.subject,
            "expected": self.expected.iter().map(Country::as_str).collect::<Vec<_>>(),
            "detected": self.detected.as_str(),
            "note": self.note,
        })
    }
}

/// Everything the geography rules read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEvidence {
    pub profile: GeoProfile,
    pub plausible: Vec<Country>,
    pub cross_border: bool,
    pub cross_border_markers: Vec<String>,
    pub currency: ConsistencyCheck,
    pub tax: ConsistencyCheck,
}

impl GeoEvidence {
    /// Evidence for a document with no usable geography signal.
    pub fn unknown() -> Self {
        Self {
            profile: GeoProfile::unknown(Vec::new()),
            plausible: Vec::new(),
            cross_border: false,
            cross_border_markers: Vec::new(),
            currency: ConsistencyCheck::unverifiable(Country::Unknown, "country unknown"),
            tax: ConsistencyCheck::unverifiable(Country::Unknown, "country unknown"),
        }
    }
}

/// Evidence plus the diagnostics that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAssessment {
    pub evidence: GeoEvidence,
    pub diagnostics: GeoDiagnostics,
}
