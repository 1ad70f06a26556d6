use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::StashId;

/// A flat, hand-picked set of cards drawn from any decks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stash {
    pub id: StashId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl StashUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
