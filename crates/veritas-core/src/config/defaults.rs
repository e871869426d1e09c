// Single source of truth for all default values.

// --- Label thresholds ---
pub const DEFAULT_SUSPICIOUS_AT: f64 = 0.30;
pub const DEFAULT_FAKE_AT: f64 = 0.60;

// --- Geo ---
pub const DEFAULT_GEO_UNKNOWN_FLOOR: f64 = 0.30;
pub const DEFAULT_GEO_MIN_WINNER_SCORE: f64 = 3.0;
pub const DEFAULT_GEO_NO_STRONG_SIGNAL_CAP: f64 = 0.25;
pub const DEFAULT_GEO_DENOMINATOR_FLOOR: f64 = 4.0;
pub const DEFAULT_GEO_LOW_CONFIDENCE_CUTOFF: f64 = 0.50;
pub const DEFAULT_GEO_LOW_CONFIDENCE_PENALTY: f64 = 0.85;
pub const DEFAULT_GEO_PLAUSIBLE_RATIO: f64 = 0.60;

// --- Document gate ---
pub const DEFAULT_DOC_MIN_CONFIDENCE: f64 = 0.55;
pub const DEFAULT_DOC_LOW_CONFIDENCE_DISCOUNT: f64 = 0.50;

// --- Learned rules ---
pub const DEFAULT_LEARNED_LOW_CONFIDENCE_CLAMP: f64 = 0.05;
pub const DEFAULT_LEARNED_MAX_TOTAL_DELTA: f64 = 0.25;
pub const DEFAULT_LEARNED_MAX_RULE_DELTA: f64 = 0.15;
pub const DEFAULT_LEARNED_MIN_OBSERVATIONS: u32 = 5;

// --- Rules ---
pub const DEFAULT_AMOUNT_TOLERANCE: f64 = 0.02;
pub const DEFAULT_AMOUNT_RELATIVE_TOLERANCE: f64 = 0.01;
pub const DEFAULT_DATE_GAP_DAYS: i64 = 365;
pub const DEFAULT_CAPTURE_GRACE_HOURS: i64 = 24;
pub const DEFAULT_METADATA_GRACE_MINUTES: i64 = 10;
pub const DEFAULT_ROUND_TOTAL_MINIMUM: f64 = 100.0;
pub const DEFAULT_STRICT_CONSISTENCY: bool = false;

// --- Ensemble ---
pub const DEFAULT_HARD_FAIL_CONFIDENCE: f64 = 0.93;
pub const DEFAULT_RULE_FAKE_CONFIDENCE: f64 = 0.85;
pub const DEFAULT_CRITICAL_COUNT_FOR_FAKE: usize = 3;
pub const DEFAULT_VETO_THRESHOLD: f64 = 0.85;
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.80;
pub const DEFAULT_LOW_CONFIDENCE: f64 = 0.50;
pub const DEFAULT_AGREEMENT_THRESHOLD: f64 = 0.70;
pub const DEFAULT_AGREEMENT_BONUS: f64 = 0.05;
pub const DEFAULT_MISSING_OPTIONAL_PENALTY: f64 = 0.05;

// --- Engines ---
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;
pub const DEFAULT_CRITICAL_POOL_SIZE: usize = 2;
pub const DEFAULT_DETERMINISTIC_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LARGE_MODEL_TIMEOUT_MS: u64 = 30_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = true;
