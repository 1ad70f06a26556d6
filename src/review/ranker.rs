//! Picks one card out of a sampled window.
//!
//! Urgency functions must be non-decreasing in elapsed time, non-increasing
//! in the smoothed success ratio, and finite for a card with no reviews.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::models::{Candidate, RankStrategy};
use crate::ids::CardId;
use crate::ledger::scoring::{ScoreFunction, SmoothedRatio, DEFAULT_PRIOR};

/// Inputs an urgency function may look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyInput {
    pub success: u32,
    pub fail: u32,
    /// Seconds since the card was last reviewed or skipped
    pub elapsed_secs: i64,
    pub times_reviewed: u32,
}

impl UrgencyInput {
    pub fn from_candidate(candidate: &Candidate, now: DateTime<Utc>) -> Self {
        Self {
            success: candidate.success,
            fail: candidate.fail,
            elapsed_secs: (now - candidate.last_reviewed).num_seconds(),
            times_reviewed: candidate.times_reviewed,
        }
    }
}

pub trait UrgencyFunction: Send + Sync {
    fn urgency(&self, input: &UrgencyInput) -> f64;
}

/// `(1 - p) * ln(2 + hours) / sqrt(1 + times_reviewed)`
///
/// `p` is the smoothed success ratio. Waiting raises urgency
/// logarithmically; a long review record damps it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayUrgency {
    pub ratio: SmoothedRatio,
}

impl Default for DecayUrgency {
    fn default() -> Self {
        Self {
            ratio: SmoothedRatio { prior: DEFAULT_PRIOR },
        }
    }
}

impl UrgencyFunction for DecayUrgency {
    fn urgency(&self, input: &UrgencyInput) -> f64 {
        let p = self.ratio.score(input.success, input.fail).clamp(0.0, 1.0);
        let hours = input.elapsed_secs.max(0) as f64 / 3600.0;
        (1.0 - p) * (2.0 + hours).ln() / (1.0 + f64::from(input.times_reviewed)).sqrt()
    }
}

/// Choose one candidate from `window` according to `strategy`
pub fn rank(
    window: &[Candidate],
    strategy: RankStrategy,
    urgency: &dyn UrgencyFunction,
    now: DateTime<Utc>,
) -> Option<CardId> {
    match strategy {
        RankStrategy::None => window.first().map(|c| c.card),
        RankStrategy::Age => window
            .iter()
            .min_by_key(|c| (c.last_reviewed, c.card))
            .map(|c| c.card),
        RankStrategy::Urgency => window
            .iter()
            .map(|c| (urgency.urgency(&UrgencyInput::from_candidate(c, now)), c.card))
            .max_by(|(ua, ida), (ub, idb)| match ua.total_cmp(ub) {
                // Smaller id wins a tie, so it must compare as greater
                Ordering::Equal => idb.cmp(ida),
                other => other,
            })
            .map(|(_, card)| card),
    }
}
