//! Pinned "next card" per review scope.
//!
//! A scope is either `Empty` or `Picked(card, pinned_at)`. A pick stays until
//! one of the invalidation calls below removes it; card deletion removes it
//! through the foreign-key cascade.

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::models::{PickState, ReviewScope};
use crate::clock::from_unix;
use crate::error::Result;
use crate::ids::{CardId, StashId};

/// Pick table access bound to one connection or transaction
pub struct PickCache<'c> {
    conn: &'c Connection,
}

impl<'c> PickCache<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, scope: ReviewScope) -> Result<PickState> {
        let row: Option<(CardId, i64)> = match scope {
            ReviewScope::Deck(deck) => self
                .conn
                .query_row(
                    "SELECT card, created_at FROM current_pick_by_deck WHERE deck = :deck",
                    named_params! { ":deck": deck },
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
            ReviewScope::Stash(stash) => self
                .conn
                .query_row(
                    "SELECT card, created_at FROM current_pick_by_stash WHERE stash = :stash",
                    named_params! { ":stash": stash },
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
        };

        Ok(match row {
            Some((card, pinned_at)) => PickState::Picked {
                card,
                pinned_at: from_unix(pinned_at),
            },
            None => PickState::Empty,
        })
    }

    /// Pin `card` as the scope's pick, replacing any previous one
    pub fn pin(&self, scope: ReviewScope, card: CardId, now: DateTime<Utc>) -> Result<()> {
        match scope {
            ReviewScope::Deck(deck) => self.conn.execute(
                "INSERT OR REPLACE INTO current_pick_by_deck (deck, card, created_at)
                 VALUES (:deck, :card, :now)",
                named_params! { ":deck": deck, ":card": card, ":now": now.timestamp() },
            )?,
            ReviewScope::Stash(stash) => self.conn.execute(
                "INSERT OR REPLACE INTO current_pick_by_stash (stash, card, created_at)
                 VALUES (:stash, :card, :now)",
                named_params! { ":stash": stash, ":card": card, ":now": now.timestamp() },
            )?,
        };
        log::debug!("Pinned {} for {}", card, scope);
        Ok(())
    }

    /// Drop the scope's pick. Returns whether one existed.
    pub fn invalidate_scope(&self, scope: ReviewScope) -> Result<bool> {
        let removed = match scope {
            ReviewScope::Deck(deck) => self.conn.execute(
                "DELETE FROM current_pick_by_deck WHERE deck = :deck",
                named_params! { ":deck": deck },
            )?,
            ReviewScope::Stash(stash) => self.conn.execute(
                "DELETE FROM current_pick_by_stash WHERE stash = :stash",
                named_params! { ":stash": stash },
            )?,
        };
        Ok(removed > 0)
    }

    /// Drop every pick, in any scope, that points at `card`
    pub fn invalidate_card(&self, card: CardId) -> Result<usize> {
        let by_deck = self.conn.execute(
            "DELETE FROM current_pick_by_deck WHERE card = :card",
            named_params! { ":card": card },
        )?;
        let by_stash = self.conn.execute(
            "DELETE FROM current_pick_by_stash WHERE card = :card",
            named_params! { ":card": card },
        )?;
        let removed = by_deck + by_stash;
        if removed > 0 {
            log::debug!("Invalidated {} pick(s) of {}", removed, card);
        }
        Ok(removed)
    }

    /// Drop the stash's pick if it is `card`
    pub fn invalidate_stash_card(&self, stash: StashId, card: CardId) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM current_pick_by_stash WHERE stash = :stash AND card = :card",
            named_params! { ":stash": stash, ":card": card },
        )?;
        Ok(removed > 0)
    }

    /// Drop deck picks whose card no longer sits under the pick's deck
    pub fn prune_stale_deck_picks(&self) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM current_pick_by_deck
             WHERE NOT EXISTS (
                 SELECT 1 FROM cards AS c
                 JOIN deck_closure AS dc ON dc.descendant = c.deck
                 WHERE c.card_id = current_pick_by_deck.card
                   AND dc.ancestor = current_pick_by_deck.deck
             )",
            [],
        )?;
        if removed > 0 {
            log::debug!("Pruned {} stale deck pick(s)", removed);
        }
        Ok(removed)
    }
}
