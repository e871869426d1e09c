//! DocumentProfileGate: which field-presence rules apply to a document.

use serde::{Deserialize, Serialize};
use veritas_core::config::DocumentGateConfig;
use veritas_core::errors::ConsistencyError;
use veritas_core::models::{DocProfile, DocSubtype};

/// A field whose absence the catalogue checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Amount,
    Total,
    Date,
    Merchant,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Total => "total",
            Self::Date => "date",
            Self::Merchant => "merchant",
        }
    }
}

/// Gates document-aware rules on the canonical [`DocProfile`].
#[derive(Debug, Clone, Default)]
pub struct DocumentProfileGate {
    config: DocumentGateConfig,
}

impl DocumentProfileGate {
    pub fn new(config: DocumentGateConfig) -> Self {
        Self { config }
    }

    /// Whether document-aware rules run at all.
    pub fn enabled(&self, doc: &DocProfile) -> bool {
        doc.confidence() >= self.config.min_confidence
    }

    /// Multiplier for learned-rule influence. Never zero.
    pub fn discount(&self, doc: &DocProfile) -> f64 {
        if self.enabled(doc) {
            1.0
        } else {
            self.config.low_confidence_discount
        }
    }

    /// Whether this kind of document normally carries `field`.
    pub fn expects(&self, doc: &DocProfile, field: Field) -> bool {
        match doc.subtype() {
            DocSubtype::AirWaybill
            | DocSubtype::BillOfLading
            | DocSubtype::DeliveryNote
            | DocSubtype::BoardingPass => !matches!(field, Field::Amount | Field::Total),
            DocSubtype::BankStatement => field != Field::Merchant,
            _ => true,
        }
    }

    /// Refuse a profile that breaks the canonical invariants.
    pub fn admit(&self, doc: &DocProfile) -> Result<(), ConsistencyError> {
        match doc.invariant_violation() {
            Some(detail) => Err(ConsistencyError::NonCanonicalDocProfile {
                component: "document_gate".to_string(),
                detail,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::models::DocFamily;

    fn profile(family: DocFamily, subtype: DocSubtype, confidence: f64) -> DocProfile {
        DocProfile::canonical(family, subtype, confidence, vec![])
    }

    #[test]
    fn threshold_is_inclusive() {
        let gate = DocumentProfileGate::default();
        assert!(gate.enabled(&profile(DocFamily::Receipt, DocSubtype::PosReceipt, 0.55)));
        assert!(!gate.enabled(&profile(DocFamily::Receipt, DocSubtype::PosReceipt, 0.5499)));
    }

    #[test]
    fn discount_is_reduced_not_zero() {
        let gate = DocumentProfileGate::default();
        assert_eq!(gate.discount(&profile(DocFamily::Receipt, DocSubtype::PosReceipt, 0.9)), 1.0);
        assert_eq!(gate.discount(&DocProfile::unknown()), 0.5);
    }

    #[test]
    fn omission_table() {
        let gate = DocumentProfileGate::default();
        let awb = profile(DocFamily::Logistics, DocSubtype::AirWaybill, 0.8);
        assert!(!gate.expects(&awb, Field::Total));
        assert!(!gate.expects(&awb, Field::Amount));
        assert!(gate.expects(&awb, Field::Date));

        let pass = profile(DocFamily::Travel, DocSubtype::BoardingPass, 0.8);
        assert!(!gate.expects(&pass, Field::Total));

        let statement = profile(DocFamily::Statement, DocSubtype::BankStatement, 0.8);
        assert!(!gate.expects(&statement, Field::Merchant));
        assert!(gate.expects(&statement, Field::Total));

        let folio = profile(DocFamily::Travel, DocSubtype::HotelFolio, 0.8);
        assert!(gate.expects(&folio, Field::Total));
    }

    #[test]
    fn deserialized_profile_with_bad_subtype_is_refused() {
        let raw = r#"{"family":"RECEIPT","subtype":"AIR_WAYBILL","confidence":0.9,"evidence":[]}"#;
        let doc: DocProfile = serde_json::from_str(raw).unwrap();
        assert!(DocumentProfileGate::default().admit(&doc).is_err());
    }
}
