//! Test fixture loader for Veritas golden scenarios.
//!
//! Fixture JSON lives beside this crate under `golden/`. Any crate in the
//! workspace can load it by relative path.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use veritas_core::models::{ClassificationHints, FeatureSet, Label, LearnedRule};

/// Directory holding the fixture files.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // Walk up from the calling crate until the fixtures crate is a child.
    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/golden from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// What a golden scenario must produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedDecision {
    pub label: Label,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    /// Codes that must fire.
    #[serde(default)]
    pub fired: Vec<String>,
    /// Codes that must not fire.
    #[serde(default)]
    pub not_fired: Vec<String>,
    /// Audit event codes that must be present.
    #[serde(default)]
    pub events: Vec<String>,
}

/// One document plus its expected rule decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenScenario {
    pub name: String,
    pub description: String,
    pub features: FeatureSet,
    #[serde(default)]
    pub hints: ClassificationHints,
    #[serde(default)]
    pub learned_rules: Vec<LearnedRule>,
    pub expected: ExpectedDecision,
}

/// Golden scenario files, in a stable order.
pub const GOLDEN_SCENARIOS: &[&str] = &[
    "golden/clean_receipt.json",
    "golden/template_tool.json",
    "golden/currency_mismatch.json",
    "golden/air_waybill_without_total.json",
    "golden/inflated_total.json",
    "golden/learned_merchant.json",
];

/// Load every golden scenario.
pub fn golden_scenarios() -> Vec<GoldenScenario> {
    GOLDEN_SCENARIOS.iter().map(|p| load_fixture(p)).collect()
}
