//! Data models for cards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CardId, DeckId};

/// A study card living in exactly one deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    pub deck: DeckId,
    pub created_at: DateTime<Utc>,
    /// Last content edit. Reviews never touch this.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub deck: DeckId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

impl NewCard {
    pub fn new(deck: DeckId, title: impl Into<String>) -> Self {
        Self {
            deck,
            title: title.into(),
            description: String::new(),
            front: String::new(),
            back: String::new(),
        }
    }

    pub fn with_sides(mut self, front: impl Into<String>, back: impl Into<String>) -> Self {
        self.front = front.into();
        self.back = back.into();
        self
    }
}

/// Fields of a card that may be changed after creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
    /// Move the card to another deck
    pub deck: Option<DeckId>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.front.is_none()
            && self.back.is_none()
            && self.deck.is_none()
    }

    /// Whether any text field changes
    pub fn touches_content(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.front.is_some()
            || self.back.is_some()
    }
}
