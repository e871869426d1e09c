//! Canonical document classification.
//!
//! [`DocCandidate`] is the raw upstream guess. [`DocProfile`] is the single canonical
//! value the gates read; it can only be built through [`DocProfile::canonical`] or
//! [`DocProfile::unknown`], which enforce its invariants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad document family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocFamily {
    Receipt,
    Invoice,
    Logistics,
    Travel,
    Statement,
    Unknown,
}

/// Specific document kind within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocSubtype {
    PosReceipt,
    RestaurantBill,
    FuelReceipt,
    TaxInvoice,
    ProformaInvoice,
    AirWaybill,
    BillOfLading,
    DeliveryNote,
    BoardingPass,
    HotelFolio,
    BankStatement,
    Unknown,
}

impl DocSubtype {
    /// The family this subtype belongs to. `Unknown` belongs to every family.
    pub fn family(&self) -> DocFamily {
        match self {
            Self::PosReceipt | Self::RestaurantBill | Self::FuelReceipt => DocFamily::Receipt,
            Self::TaxInvoice | Self::ProformaInvoice => DocFamily::Invoice,
            Self::AirWaybill | Self::BillOfLading | Self::DeliveryNote => DocFamily::Logistics,
            Self::BoardingPass | Self::HotelFolio => DocFamily::Travel,
            Self::BankStatement => DocFamily::Statement,
            Self::Unknown => DocFamily::Unknown,
        }
    }
}

impl fmt::Display for DocFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Raw, pre-finalization classification guess from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocCandidate {
    pub family: DocFamily,
    pub subtype: DocSubtype,
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Canonical document profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocProfile {
    family: DocFamily,
    subtype: DocSubtype,
    confidence: f64,
    evidence: Vec<String>,
}

impl DocProfile {
    /// Build the canonical profile.
    ///
    /// Confidence is clamped to [0, 1] (non-finite becomes 0). A subtype that does not
    /// belong to `family` is coerced to `Unknown` and the coercion recorded as evidence.
    pub fn canonical(
        family: DocFamily,
        subtype: DocSubtype,
        confidence: f64,
        mut evidence: Vec<String>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let subtype = if subtype == DocSubtype::Unknown || subtype.family() == family {
            subtype
        } else {
            evidence.push(format!(
                "subtype {:?} does not belong to family {:?}; coerced to UNKNOWN",
                subtype, family
            ));
            DocSubtype::Unknown
        };
        Self {
            family,
            subtype,
            confidence,
            evidence,
        }
    }

    /// Finalize a raw candidate. Called exactly once per analysis by the pipeline.
    pub fn from_candidate(candidate: &DocCandidate) -> Self {
        Self::canonical(
            candidate.family,
            candidate.subtype,
            candidate.confidence,
            candidate.evidence.clone(),
        )
    }

    /// Profile used when classification produced nothing usable.
    pub fn unknown() -> Self {
        Self {
            family: DocFamily::Unknown,
            subtype: DocSubtype::Unknown,
            confidence: 0.0,
            evidence: Vec::new(),
        }
    }

    pub fn family(&self) -> DocFamily {
        self.family
    }

    pub fn subtype(&self) -> DocSubtype {
        self.subtype
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    /// Describe why this profile breaks the canonical invariants, if it does.
    ///
    /// Profiles built through the constructors never do; a deserialized one might.
    pub fn invariant_violation(&self) -> Option<String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Some(format!("confidence {} outside [0, 1]", self.confidence));
        }
        if self.subtype != DocSubtype::Unknown && self.subtype.family() != self.family {
            return Some(format!(
                "subtype {:?} does not belong to family {:?}",
                self.subtype, self.family
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_clamps_confidence() {
        let p = DocProfile::canonical(DocFamily::Receipt, DocSubtype::PosReceipt, 1.7, vec![]);
        assert_eq!(p.confidence(), 1.0);
        let p = DocProfile::canonical(DocFamily::Receipt, DocSubtype::PosReceipt, f64::NAN, vec![]);
        assert_eq!(p.confidence(), 0.0);
    }

    #[test]
    fn mismatched_subtype_is_coerced() {
        let p = DocProfile::canonical(DocFamily::Receipt, DocSubtype::AirWaybill, 0.9, vec![]);
        assert_eq!(p.subtype(), DocSubtype::Unknown);
        assert_eq!(p.evidence().len(), 1);
        assert!(p.invariant_violation().is_none());
    }

    #[test]
    fn deserialized_profile_can_violate_invariants() {
        let json = r#"{"family":"RECEIPT","subtype":"AIR_WAYBILL","confidence":0.9,"evidence":[]}"#;
        let p: DocProfile = serde_json::from_str(json).unwrap();
        assert!(p.invariant_violation().is_some());
    }
}
