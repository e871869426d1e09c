use serde::{Deserialize, Serialize};

use super::DocCandidate;

/// Upstream classification guesses that travel beside a [`super::FeatureSet`].
///
/// Nothing here is read by rules. The pipeline finalizes `doc` into the canonical
/// [`super::DocProfile`] once, and the geography matrix treats `geo_country` as one
/// weak signal among many.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationHints {
    pub doc: Option<DocCandidate>,
    /// ISO-3166 alpha-2 guess from upstream.
    pub geo_country: Option<String>,
    pub geo_confidence: Option<f64>,
    /// BCP-47 language guess.
    pub language: Option<String>,
    pub language_confidence: Option<f64>,
}
