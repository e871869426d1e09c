//! # veritas-learning
//!
//! Learned rules: the snapshot store analyses read from, the application of a
//! snapshot to one document, and the feedback loop that proposes new rules.

pub mod apply;
pub mod beta;
pub mod feedback;
pub mod store;

pub use apply::{apply, learned_code, LearnedApplication};
pub use feedback::{AnalystLabel, FeedbackLearner, FeedbackRecord};
pub use store::LearnedRuleStore;
