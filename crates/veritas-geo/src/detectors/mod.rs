//! Per-region signal detectors and the registry that dispatches to them.

macro_rules! geo_pattern {
    ($name:ident, $regex_str:expr) => {
        pub(crate) static $name: std::sync::LazyLock<Option<regex::Regex>> =
            std::sync::LazyLock::new(|| regex::Regex::new($regex_str).ok());
    };
}

mod au;
mod ca;
mod de;
mod fr;
mod gb;
mod india;
mod us;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use veritas_core::models::Country;

/// How much a signal says about a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    /// Formatted identifiers unique to one region.
    Strong,
    /// Shared or generic tokens.
    Weak,
}

/// A compiled region signal.
pub struct SignalPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
    pub weight: f64,
    pub strength: Strength,
}

/// A signal found in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHit {
    pub name: String,
    pub weight: f64,
    pub strength: Strength,
    /// First matching fragment.
    pub fragment: String,
}

/// Detector function value: text in, signal hits out.
pub type DetectorFn = fn(&str) -> Vec<SignalHit>;

/// One registry entry.
#[derive(Clone, Copy)]
pub struct RegionDetector {
    pub country: Country,
    pub detect: DetectorFn,
}

/// Every known region detector, in a fixed order.
pub fn registry() -> &'static [RegionDetector] {
    static REGISTRY: [RegionDetector; 7] = [
        RegionDetector { country: Country::US, detect: us::detect },
        RegionDetector { country: Country::CA, detect: ca::detect },
        RegionDetector { country: Country::GB, detect: gb::detect },
        RegionDetector { country: Country::DE, detect: de::detect },
        RegionDetector { country: Country::FR, detect: fr::detect },
        RegionDetector { country: Country::AU, detect: au::detect },
        RegionDetector { country: Country::IN, detect: india::detect },
    ];
    &REGISTRY
}

/// Run a pattern table over `text`. Each pattern counts once however often it matches.
///
/// A pattern whose regex failed to compile simply never matches.
pub fn scan(text: &str, patterns: &[SignalPattern]) -> Vec<SignalHit> {
    patterns
        .iter()
        .filter_map(|p| {
            let re = p.regex.as_ref()?;
            let m = re.find(text)?;
            Some(SignalHit {
                name: p.name.to_string(),
                weight: p.weight,
                strength: p.strength,
                fragment: m.as_str().trim().to_string(),
            })
        })
        .collect()
}
