/// Learned-rule publication errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LearningError {
    #[error("learned rule {pattern_id} may not carry severity {severity}")]
    ForbiddenSeverity { pattern_id: String, severity: String },

    #[error("learned rule {pattern_id} delta {delta:.3} exceeds bound {bound:.3}")]
    DeltaOutOfBounds {
        pattern_id: String,
        delta: f64,
        bound: f64,
    },

    #[error("duplicate learned pattern id: {pattern_id}")]
    DuplicatePattern { pattern_id: String },
}
