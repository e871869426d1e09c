//! # veritas-geo
//!
//! Infers the issuing country of a document from weighted per-region signals and
//! checks the document's currency and tax regime against it.
//!
//! ## Signals
//! - **Strong** (2–3×): formatted tax ids, phone prefixes, postal formats.
//! - **Weak** (1×): shared currency symbols, generic tokens, upstream hints.
//!
//! Region detectors live in a registry table; adding a region means adding a
//! detector module and one registry entry.

pub mod detectors;
pub mod evidence;
pub mod matrix;
pub mod reference;

pub use evidence::{CheckStatus, ConsistencyCheck, GeoAssessment, GeoEvidence, GeoInference};
pub use matrix::GeoConsistencyMatrix;
