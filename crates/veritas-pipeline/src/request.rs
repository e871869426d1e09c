use serde::{Deserialize, Serialize};
use veritas_core::errors::{VeritasError, VeritasResult};
use veritas_core::models::{ClassificationHints, DocProfile, FeatureSet};

/// Everything the pipeline needs for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub features: FeatureSet,
    #[serde(default)]
    pub hints: ClassificationHints,
    /// Already-finalized profile from the classification step. When absent the
    /// pipeline finalizes `hints.doc` once.
    #[serde(default)]
    pub doc_profile: Option<DocProfile>,
}

impl AnalysisRequest {
    pub fn new(features: FeatureSet) -> Self {
        Self {
            features,
            hints: ClassificationHints::default(),
            doc_profile: None,
        }
    }

    pub fn with_hints(mut self, hints: ClassificationHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_doc_profile(mut self, profile: DocProfile) -> Self {
        self.doc_profile = Some(profile);
        self
    }

    /// Fresh analysis id for callers that do not bring their own.
    pub fn new_analysis_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// The single canonical profile for this analysis.
    pub fn finalize_doc_profile(&self) -> DocProfile {
        match (&self.doc_profile, &self.hints.doc) {
            (Some(profile), _) => profile.clone(),
            (None, Some(candidate)) => DocProfile::from_candidate(candidate),
            (None, None) => DocProfile::unknown(),
        }
    }

    pub(crate) fn validate(&self) -> VeritasResult<()> {
        if self.features.analysis_id.trim().is_empty() {
            return Err(VeritasError::InvalidInput {
                field: "analysis_id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
