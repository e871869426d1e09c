//! # veritas-rules
//!
//! The deterministic half of a decision: a fixed catalogue of pure rules, the
//! document-profile gate that decides which field-presence rules apply, and the
//! engine that aggregates outcomes (plus learned-rule deltas) into a [`Decision`].
//!
//! [`Decision`]: veritas_core::models::Decision

pub mod context;
pub mod engine;
pub mod gate;
pub mod rules;

pub use context::RuleContext;
pub use engine::RuleEngine;
pub use gate::{DocumentProfileGate, Field};
pub use rules::{default_catalogue, Finding, Rule};
