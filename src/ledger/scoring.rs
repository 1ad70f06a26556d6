//! Score functions for the ledger
//!
//! A score is an estimate of how reliably a card is recalled, in `[0, 1]`.
//! Raw `success / (success + fail)` jumps straight to 0 or 1 after a single
//! review, so the default adds a pseudo-count to both sides.

/// Maps running success/fail counts to a score in `[0, 1]`
pub trait ScoreFunction: Send + Sync {
    fn score(&self, success: u32, fail: u32) -> f64;
}

impl<F> ScoreFunction for F
where
    F: Fn(u32, u32) -> f64 + Send + Sync,
{
    fn score(&self, success: u32, fail: u32) -> f64 {
        self(success, fail)
    }
}

/// `(success + prior) / (success + fail + 2 * prior)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedRatio {
    pub prior: f64,
}

/// Pseudo-count used when none is configured
pub const DEFAULT_PRIOR: f64 = 0.5;

impl SmoothedRatio {
    /// Jeffreys prior: half a success and half a failure
    pub fn jeffreys() -> Self {
        Self { prior: 0.5 }
    }

    /// Laplace's rule of succession: one of each
    pub fn laplace() -> Self {
        Self { prior: 1.0 }
    }
}

impl Default for SmoothedRatio {
    fn default() -> Self {
        Self { prior: DEFAULT_PRIOR }
    }
}

impl ScoreFunction for SmoothedRatio {
    fn score(&self, success: u32, fail: u32) -> f64 {
        let prior = self.prior.max(0.0);
        let total = f64::from(success) + f64::from(fail) + 2.0 * prior;
        if total <= 0.0 {
            // Zero prior and no attempts
            return 0.5;
        }
        (f64::from(success) + prior) / total
    }
}
