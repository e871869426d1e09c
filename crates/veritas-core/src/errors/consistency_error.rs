/// Raised when a gate would read a profile that breaks its canonical invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("non-canonical document profile at {component}: {detail}")]
    NonCanonicalDocProfile { component: String, detail: String },

    #[error("non-canonical geo profile at {component}: {detail}")]
    NonCanonicalGeoProfile { component: String, detail: String },
}
