//! Data models for the score ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CardId;

/// Running review statistics of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub card: CardId,
    pub success: u32,
    pub fail: u32,
    pub score: f64,
    pub times_reviewed: u32,
    /// Bumped by every outcome and every skip
    pub updated_at: DateTime<Utc>,
    /// Note attached to the most recent change
    #[serde(default)]
    pub changelog: String,
}

impl ScoreRecord {
    pub fn attempts(&self) -> u32 {
        self.success + self.fail
    }
}

/// One row of score history, written once per recorded outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub card: CardId,
    pub occurred_at: DateTime<Utc>,
    pub success: u32,
    pub fail: u32,
    pub score: f64,
    #[serde(default)]
    pub changelog: String,
}

/// Result of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl From<bool> for Outcome {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}
