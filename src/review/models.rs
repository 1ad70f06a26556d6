//! Data models for review scheduling

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::ids::{CardId, DeckId, StashId};
use crate::ledger::ScoreRecord;

/// The set of cards a review request draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ReviewScope {
    /// A deck and every deck beneath it
    Deck(DeckId),
    Stash(StashId),
}

impl fmt::Display for ReviewScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deck(id) => id.fmt(f),
            Self::Stash(id) => id.fmt(f),
        }
    }
}

impl From<DeckId> for ReviewScope {
    fn from(id: DeckId) -> Self {
        Self::Deck(id)
    }
}

impl From<StashId> for ReviewScope {
    fn from(id: StashId) -> Self {
        Self::Stash(id)
    }
}

/// How the sampled window is narrowed down to one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankStrategy {
    /// First card of the window
    None,
    /// Least recently reviewed card
    Age,
    /// Highest urgency, smallest id on ties
    #[default]
    Urgency,
}

impl FromStr for RankStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "age" => Ok(Self::Age),
            "urgency" => Ok(Self::Urgency),
            other => Err(format!(
                "unknown strategy '{}', expected none, age or urgency",
                other
            )),
        }
    }
}

impl fmt::Display for RankStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Age => "age",
            Self::Urgency => "urgency",
        };
        f.write_str(name)
    }
}

/// Knobs for one "next card" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Minimum time since the last review before a card is eligible again
    pub age_of_consent: Duration,
    /// Number of eligible cards handed to the ranker
    pub purgatory_size: u32,
    /// Eligible cards skipped before the window starts
    pub purgatory_index: u32,
    pub strategy: RankStrategy,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            age_of_consent: Duration::seconds(600),
            purgatory_size: 15,
            purgatory_index: 0,
            strategy: RankStrategy::default(),
        }
    }
}

/// An eligible card as seen by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub card: CardId,
    pub success: u32,
    pub fail: u32,
    pub score: f64,
    pub times_reviewed: u32,
    pub last_reviewed: DateTime<Utc>,
}

/// Card counts of a scope, as shown before asking for the next card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeCounts {
    pub total: u64,
    /// Never reviewed
    pub new: u64,
    /// Eligible for review now, new cards included
    pub due: u64,
}

/// Cached pick of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    Empty,
    Picked {
        card: CardId,
        pinned_at: DateTime<Utc>,
    },
}

impl PickState {
    pub fn card(&self) -> Option<CardId> {
        match self {
            Self::Empty => None,
            Self::Picked { card, .. } => Some(*card),
        }
    }
}

/// Answer to a "next card" request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPick {
    pub scope: ReviewScope,
    pub card: Card,
    pub score: ScoreRecord,
    pub pinned_at: DateTime<Utc>,
    /// Served from the pick cache rather than freshly sampled
    pub cached: bool,
}
