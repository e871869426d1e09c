use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a rule outcome or audit event.
///
/// Declaration order is the precedence order: `Info < Critical < HardFail`.
/// A single `HardFail` outranks any number of lower-severity signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Critical,
    HardFail,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Critical => "CRITICAL",
            Self::HardFail => "HARD_FAIL",
        }
    }

    /// Whether this severity forces the rejecting verdict on its own.
    pub fn is_hard_fail(&self) -> bool {
        matches!(self, Self::HardFail)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
