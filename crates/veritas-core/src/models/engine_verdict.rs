//! External engine verdicts, raw and normalized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Latency tier of an engine; selects its default timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineTier {
    Deterministic,
    ModelBacked,
    LargeModel,
}

/// How an engine's result is allowed to influence the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRole {
    /// A critical engine must complete or the analysis is incomplete.
    pub critical: bool,
    /// A veto-capable engine may reject on its own but never approve.
    pub veto_capable: bool,
}

impl EngineRole {
    pub const OPTIONAL: Self = Self {
        critical: false,
        veto_capable: false,
    };
}

/// Closed verdict vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictTag {
    Genuine,
    Fraud,
    Uncertain,
}

impl VerdictTag {
    /// Map a free-form engine tag onto the closed vocabulary.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "clean" | "authentic" | "genuine" | "real" | "ok" | "pass" | "valid" => Self::Genuine,
            "fraud" | "fraudulent" | "fake" | "forged" | "tampered" | "manipulated" | "fail" => {
                Self::Fraud
            }
            _ => Self::Uncertain,
        }
    }
}

impl fmt::Display for VerdictTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genuine => f.write_str("genuine"),
            Self::Fraud => f.write_str("fraud"),
            Self::Uncertain => f.write_str("uncertain"),
        }
    }
}

/// Confidence as an engine reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawConfidence {
    /// A number of unknown scale: fraction or percentage.
    Number(f64),
    /// A qualitative level or numeric string, e.g. "high", "87%".
    Text(String),
    Missing,
}

/// What an engine returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineOutput {
    /// An opinion on the whole document.
    Verdict {
        tag: String,
        confidence: RawConfidence,
        #[serde(default)]
        observations: Vec<String>,
    },
    /// Structured fields re-extracted independently, with an extraction quality.
    Extraction {
        fields: BTreeMap<String, String>,
        quality: RawConfidence,
    },
}

/// Whether the engine produced a usable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Completed,
    Unavailable,
    TimedOut,
}

/// Normalized external opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineVerdict {
    pub engine: String,
    pub role: EngineRole,
    pub status: EngineStatus,
    pub tag: VerdictTag,
    /// Always within [0, 1]; zero when not completed.
    pub confidence: f64,
    pub observations: Vec<String>,
    pub error: Option<String>,
}

impl EngineVerdict {
    /// Verdict for an engine that did not produce a result.
    pub fn absent(
        engine: impl Into<String>,
        role: EngineRole,
        status: EngineStatus,
        error: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            role,
            status,
            tag: VerdictTag::Uncertain,
            confidence: 0.0,
            observations: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == EngineStatus::Completed
    }
}
