use veritas_core::config::RulesConfig;
use veritas_core::models::{DocProfile, FeatureSet};
use veritas_core::traits::{IMerchantDirectory, IPostalDirectory};
use veritas_geo::GeoEvidence;

/// Everything a rule may read. Rules never see raw classification hints.
pub struct RuleContext<'a> {
    pub features: &'a FeatureSet,
    pub geo: &'a GeoEvidence,
    pub doc: &'a DocProfile,
    pub config: &'a RulesConfig,
    pub merchants: Option<&'a dyn IMerchantDirectory>,
    pub postal: Option<&'a dyn IPostalDirectory>,
}

impl RuleContext<'_> {
    /// Amount tolerance for comparisons against `reference`.
    pub fn tolerance(&self, reference: f64) -> f64 {
        self.config
            .amount_tolerance
            .max(self.config.amount_relative_tolerance * reference.abs())
    }
}
