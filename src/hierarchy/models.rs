//! Data models for the deck hierarchy

use serde::{Deserialize, Serialize};

use crate::ids::DeckId;

/// A node in the deck forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckNode {
    pub id: DeckId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One row of the closure table.
///
/// Every node has a `(n, n, 0)` edge; a node with a parent `p` additionally
/// has `(a, n, depth(a, p) + 1)` for every ancestor-or-self `a` of `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureEdge {
    pub ancestor: DeckId,
    pub descendant: DeckId,
    pub depth: u32,
}

/// Fields of a deck that may be changed after creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DeckUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Portable copy of the whole deck forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySnapshot {
    pub decks: Vec<DeckNode>,
    pub edges: Vec<ClosureEdge>,
}

impl HierarchySnapshot {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
