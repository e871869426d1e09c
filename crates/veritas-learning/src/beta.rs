//! Beta posterior over fraud outcomes for one candidate pattern.
//!
//! Prior: Beta(1, 1). After `f` fraud and `g` genuine confirmations the posterior is
//! Beta(1 + f, 1 + g).

use serde::{Deserialize, Serialize};

/// Fraud/genuine evidence counts for one pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaEvidence {
    pub fraud: u32,
    pub genuine: u32,
}

impl BetaEvidence {
    pub fn observe(&mut self, fraud: bool) {
        if fraud {
            self.fraud = self.fraud.saturating_add(1);
        } else {
            self.genuine = self.genuine.saturating_add(1);
        }
    }

    pub fn observations(&self) -> u32 {
        self.fraud.saturating_add(self.genuine)
    }

    /// Posterior (alpha, beta).
    pub fn posterior_params(&self) -> (f64, f64) {
        (1.0 + f64::from(self.fraud), 1.0 + f64::from(self.genuine))
    }

    /// Posterior mean probability that a document matching the pattern is fraud.
    pub fn fraud_probability(&self) -> f64 {
        let (alpha, beta) = self.posterior_params();
        let sum = alpha + beta;
        if sum <= 0.0 || !sum.is_finite() {
            return 0.5;
        }
        (alpha / sum).clamp(0.0, 1.0)
    }
}
