//! EngineOrchestrator: runs external engines on a bounded worker pool.
//!
//! Each engine gets one task. The task waits for a pool permit, then runs the
//! blocking `assess` call on the blocking thread pool. The engine's timeout covers
//! both the permit wait and the call. When it elapses the task stops waiting and
//! any late result is dropped; the engine itself is never interrupted.
//!
//! An abandoned call keeps its permit until the engine returns. Critical engines
//! draw from their own pool, so optional engines stuck in abandoned calls can
//! never hold the permits a critical engine waits for.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::Instrument;
use veritas_core::config::EngineConfig;
use veritas_core::errors::EngineError;
use veritas_core::models::{EngineOutput, EngineRole, EngineTier, FeatureSet};
use veritas_core::traits::IVerdictEngine;

/// Result of running one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    pub engine: String,
    pub tier: EngineTier,
    pub role: EngineRole,
    pub timeout: Duration,
    pub elapsed: Duration,
    pub result: Result<EngineOutput, EngineError>,
}

/// Runs a fixed roster of engines concurrently.
pub struct EngineOrchestrator {
    engines: Vec<Arc<dyn IVerdictEngine>>,
    config: EngineConfig,
    pool: Arc<Semaphore>,
    critical_pool: Arc<Semaphore>,
}

impl EngineOrchestrator {
    /// Orchestrator with no engines.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engines(config, Vec::new())
    }

    pub fn with_engines(config: EngineConfig, engines: Vec<Arc<dyn IVerdictEngine>>) -> Self {
        let pool = Arc::new(Semaphore::new(config.worker_pool_size.max(1)));
        let critical_pool = Arc::new(Semaphore::new(config.critical_pool_size.max(1)));
        Self {
            engines,
            config,
            pool,
            critical_pool,
        }
    }

    /// Add an engine to the end of the roster.
    pub fn register(&mut self, engine: Arc<dyn IVerdictEngine>) {
        self.engines.push(engine);
    }

    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Engine names in roster order.
    pub fn roster(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.name().to_string()).collect()
    }

    /// Longest effective timeout in the roster; bounds the wall-clock cost of `run`.
    pub fn max_timeout(&self) -> Duration {
        self.engines
            .iter()
            .map(|e| self.config.timeout_for(e.name(), e.tier()))
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Run every engine and report results in roster order.
    ///
    /// Never fails: errors, panics and timeouts become `Err` results on the
    /// affected engine only.
    pub async fn run(&self, features: Arc<FeatureSet>) -> Vec<EngineRun> {
        let mut handles = Vec::with_capacity(self.engines.len());
        for engine in &self.engines {
            let name = engine.name().to_string();
            let tier = engine.tier();
            let role = engine.role();
            let timeout = self.config.timeout_for(&name, tier);
            let pool = if role.critical { &self.critical_pool } else { &self.pool };
            let span = tracing::debug_span!("veritas.engine_call", engine = %name, ?tier, critical = role.critical, timeout_ms = timeout.as_millis() as u64);
            let task = tokio::spawn(
                call_engine(
                    Arc::clone(engine),
                    Arc::clone(&features),
                    Arc::clone(pool),
                    timeout,
                )
                .instrument(span),
            );
            handles.push((name, tier, role, timeout, task));
        }

        let mut runs = Vec::with_capacity(handles.len());
        for (name, tier, role, timeout, task) in handles {
            let (elapsed, result) = match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => (
                    timeout,
                    Err(EngineError::Unavailable {
                        engine: name.clone(),
                        reason: format!("engine task failed: {join_err}"),
                    }),
                ),
            };
            runs.push(EngineRun {
                engine: name,
                tier,
                role,
                timeout,
                elapsed,
                result,
            });
        }
        runs
    }
}

async fn call_engine(
    engine: Arc<dyn IVerdictEngine>,
    features: Arc<FeatureSet>,
    pool: Arc<Semaphore>,
    timeout: Duration,
) -> (Duration, Result<EngineOutput, EngineError>) {
    let started = Instant::now();
    let name = engine.name().to_string();

    let work = {
        let name = name.clone();
        async move {
            let permit = pool.acquire_owned().await.map_err(|e| EngineError::WorkerPool {
                reason: e.to_string(),
            })?;
            let blocking = tokio::task::spawn_blocking(move || {
                // The slot stays taken until the engine actually returns.
                let _permit = permit;
                engine.assess(&features)
            });
            match blocking.await {
                Ok(result) => result,
                Err(join_err) => Err(EngineError::Unavailable {
                    engine: name,
                    reason: if join_err.is_panic() {
                        "engine panicked".to_string()
                    } else {
                        format!("engine call aborted: {join_err}")
                    },
                }),
            }
        }
    };

    let result = match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::TimedOut {
            engine: name.clone(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    };
    let elapsed = started.elapsed();

    match &result {
        Ok(_) => tracing::debug!(engine = %name, elapsed_ms = elapsed.as_millis() as u64, "engine completed"),
        Err(EngineError::TimedOut { timeout_ms, .. }) => {
            tracing::warn!(engine = %name, timeout_ms, "engine timed out; result abandoned")
        }
        Err(err) => tracing::warn!(engine = %name, error = %err, "engine unavailable"),
    }
    (elapsed, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use veritas_core::models::RawConfidence;

    struct Scripted {
        name: &'static str,
        tier: EngineTier,
        role: EngineRole,
        delay: Duration,
        fail: bool,
    }

    impl IVerdictEngine for Scripted {
        fn name(&self) -> &str {
            self.name
        }
        fn tier(&self) -> EngineTier {
            self.tier
        }
        fn role(&self) -> EngineRole {
            self.role
        }
        fn assess(&self, _features: &FeatureSet) -> Result<EngineOutput, EngineError> {
            std::thread::sleep(self.delay);
            if self.fail {
                return Err(EngineError::Unavailable {
                    engine: self.name.to_string(),
                    reason: "503".to_string(),
                });
            }
            Ok(EngineOutput::Verdict {
                tag: "clean".to_string(),
                confidence: RawConfidence::Number(0.9),
                observations: vec![],
            })
        }
    }

    fn features() -> Arc<FeatureSet> {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        Arc::new(FeatureSet::new("orchestrator-test", at, ""))
    }

    fn config(pool: usize, overrides: &[(&str, u64)]) -> EngineConfig {
        EngineConfig {
            worker_pool_size: pool,
            timeout_overrides_ms: overrides
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            ..EngineConfig::default()
        }
    }

    fn engine(name: &'static str, delay_ms: u64, fail: bool) -> Arc<dyn IVerdictEngine> {
        Arc::new(Scripted {
            name,
            tier: EngineTier::ModelBacked,
            role: EngineRole::OPTIONAL,
            delay: Duration::from_millis(delay_ms),
            fail,
        })
    }

    fn critical(name: &'static str, delay_ms: u64) -> Arc<dyn IVerdictEngine> {
        Arc::new(Scripted {
            name,
            tier: EngineTier::Deterministic,
            role: EngineRole {
                critical: true,
                veto_capable: false,
            },
            delay: Duration::from_millis(delay_ms),
            fail: false,
        })
    }

    #[tokio::test]
    async fn results_keep_roster_order() {
        let orchestrator = EngineOrchestrator::with_engines(
            config(4, &[]),
            vec![engine("slow", 60, false), engine("fast", 1, false), engine("down", 1, true)],
        );
        let runs = orchestrator.run(features()).await;
        let names: Vec<&str> = runs.iter().map(|r| r.engine.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast", "down"]);
        assert!(runs[0].result.is_ok());
        assert!(runs[1].result.is_ok());
        assert!(matches!(runs[2].result, Err(EngineError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn timeout_is_per_engine() {
        let orchestrator = EngineOrchestrator::with_engines(
            config(4, &[("hung", 30)]),
            vec![engine("hung", 300, false), engine("ok", 1, false)],
        );
        let started = Instant::now();
        let runs = orchestrator.run(features()).await;
        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(matches!(runs[0].result, Err(EngineError::TimedOut { timeout_ms: 30, .. })));
        assert!(runs[1].result.is_ok());
    }

    #[tokio::test]
    async fn timeout_covers_permit_wait() {
        // One slot: the second engine waits behind the first and runs out of time.
        let orchestrator = EngineOrchestrator::with_engines(
            config(1, &[("second", 40)]),
            vec![engine("first", 150, false), engine("second", 1, false)],
        );
        let runs = orchestrator.run(features()).await;
        assert!(runs[0].result.is_ok());
        assert!(matches!(runs[1].result, Err(EngineError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn abandoned_optional_calls_do_not_starve_critical_engines() {
        // One optional slot, taken by the hung engine from the first run onward.
        let orchestrator = EngineOrchestrator::with_engines(
            config(1, &[("hung", 20), ("core", 100)]),
            vec![engine("hung", 400, false), critical("core", 1)],
        );
        for _ in 0..3 {
            let runs = orchestrator.run(features()).await;
            assert!(matches!(runs[0].result, Err(EngineError::TimedOut { .. })));
            assert!(runs[1].result.is_ok(), "critical engine starved: {:?}", runs[1].result);
        }
    }

    struct Panicking(AtomicUsize);

    impl IVerdictEngine for Panicking {
        fn name(&self) -> &str {
            "panicky"
        }
        fn tier(&self) -> EngineTier {
            EngineTier::Deterministic
        }
        fn role(&self) -> EngineRole {
            EngineRole::OPTIONAL
        }
        fn assess(&self, _features: &FeatureSet) -> Result<EngineOutput, EngineError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            panic!("engine bug");
        }
    }

    #[tokio::test]
    async fn engine_panic_is_unavailable() {
        let engine = Arc::new(Panicking(AtomicUsize::new(0)));
        let orchestrator =
            EngineOrchestrator::with_engines(config(2, &[]), vec![engine.clone() as Arc<dyn IVerdictEngine>]);
        let runs = orchestrator.run(features()).await;
        assert_eq!(engine.0.load(Ordering::SeqCst), 1);
        match &runs[0].result {
            Err(EngineError::Unavailable { reason, .. }) => assert_eq!(reason, "engine panicked"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn max_timeout_uses_overrides_and_tiers() {
        let orchestrator = EngineOrchestrator::with_engines(
            config(2, &[("vision", 500)]),
            vec![engine("vision", 0, false), engine("extractor", 0, false)],
        );
        assert_eq!(orchestrator.max_timeout(), Duration::from_millis(10_000));
        assert_eq!(orchestrator.roster(), vec!["vision", "extractor"]);
        assert_eq!(EngineOrchestrator::new(EngineConfig::default()).max_timeout(), Duration::ZERO);
    }
}
