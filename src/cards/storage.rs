//! Card rows and the score row created alongside each card

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::models::{Card, CardUpdate, NewCard};
use crate::clock::from_unix;
use crate::error::{Result, StoreError};
use crate::hierarchy::closure;
use crate::ids::{CardId, DeckId};

const CARD_COLUMNS: &str =
    "c.card_id, c.title, c.description, c.front, c.back, c.deck, c.created_at, c.updated_at";

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(StoreError::constraint("card title must not be empty"));
    }
    Ok(())
}

pub(crate) fn read_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        front: row.get(3)?,
        back: row.get(4)?,
        deck: row.get(5)?,
        created_at: from_unix(row.get(6)?),
        updated_at: from_unix(row.get(7)?),
    })
}

/// Insert a card and its score row in one go.
///
/// Both rows share `now` as their timestamp, which is what marks the card
/// as never reviewed.
pub fn insert_card(
    conn: &Connection,
    card: &NewCard,
    now: DateTime<Utc>,
    initial_score: f64,
) -> Result<CardId> {
    validate_title(&card.title)?;
    closure::require_deck(conn, card.deck)?;

    let now = now.timestamp();
    conn.execute(
        "INSERT INTO cards (title, description, front, back, deck, created_at, updated_at)
         VALUES (:title, :description, :front, :back, :deck, :now, :now)",
        named_params! {
            ":title": card.title,
            ":description": card.description,
            ":front": card.front,
            ":back": card.back,
            ":deck": card.deck,
            ":now": now,
        },
    )?;
    let id = CardId(conn.last_insert_rowid());

    conn.execute(
        "INSERT INTO card_scores (card, success, fail, score, times_reviewed, updated_at, changelog)
         VALUES (:card, 0, 0, :score, 0, :now, '')",
        named_params! { ":card": id, ":score": initial_score, ":now": now },
    )?;

    Ok(id)
}

pub fn get_card(conn: &Connection, id: CardId) -> Result<Card> {
    conn.query_row(
        &format!("SELECT {} FROM cards AS c WHERE c.card_id = :id", CARD_COLUMNS),
        named_params! { ":id": id },
        read_card,
    )
    .optional()?
    .ok_or(StoreError::CardNotFound(id))
}

pub fn require_card(conn: &Connection, id: CardId) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM cards WHERE card_id = :id)",
        named_params! { ":id": id },
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::CardNotFound(id))
    }
}

/// Apply a typed patch to a card.
///
/// Returns the updated card and whether it changed decks.
pub fn update_card(
    conn: &Connection,
    id: CardId,
    update: &CardUpdate,
    now: DateTime<Utc>,
) -> Result<(Card, bool)> {
    if update.is_empty() {
        return Err(StoreError::constraint("card update has no fields"));
    }
    if let Some(title) = &update.title {
        validate_title(title)?;
    }

    let current = get_card(conn, id)?;
    let moved = match update.deck {
        Some(deck) if deck == current.deck => {
            return Err(StoreError::constraint(format!(
                "{} is already in {}",
                id, deck
            )));
        }
        Some(deck) => {
            closure::require_deck(conn, deck)?;
            true
        }
        None => false,
    };

    // A pure deck move is not a content edit
    let updated_at = if update.touches_content() {
        now.timestamp()
    } else {
        current.updated_at.timestamp()
    };

    conn.execute(
        "UPDATE cards
         SET title = COALESCE(:title, title),
             description = COALESCE(:description, description),
             front = COALESCE(:front, front),
             back = COALESCE(:back, back),
             deck = COALESCE(:deck, deck),
             updated_at = :updated_at
         WHERE card_id = :id",
        named_params! {
            ":id": id,
            ":title": update.title,
            ":description": update.description,
            ":front": update.front,
            ":back": update.back,
            ":deck": update.deck,
            ":updated_at": updated_at,
        },
    )?;

    Ok((get_card(conn, id)?, moved))
}

/// Delete a card. Its score, history, memberships and picks cascade.
pub fn delete_card(conn: &Connection, id: CardId) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM cards WHERE card_id = :id",
        named_params! { ":id": id },
    )?;
    if removed == 0 {
        return Err(StoreError::CardNotFound(id));
    }
    Ok(())
}

/// Cards filed directly in `deck`, or anywhere beneath it when `recursive`
pub fn cards_in_deck(conn: &Connection, deck: DeckId, recursive: bool) -> Result<Vec<Card>> {
    closure::require_deck(conn, deck)?;

    let sql = if recursive {
        format!(
            "SELECT {} FROM cards AS c
             JOIN deck_closure AS dc ON dc.descendant = c.deck
             WHERE dc.ancestor = :deck
             ORDER BY c.card_id",
            CARD_COLUMNS
        )
    } else {
        format!(
            "SELECT {} FROM cards AS c WHERE c.deck = :deck ORDER BY c.card_id",
            CARD_COLUMNS
        )
    };

    let mut stmt = conn.prepare(&sql)?;
    let cards = stmt
        .query_map(named_params! { ":deck": deck }, read_card)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// The card's deck preceded by all of its ancestors, root first
pub fn deck_path(conn: &Connection, id: CardId) -> Result<Vec<DeckId>> {
    let card = get_card(conn, id)?;
    let mut path = closure::ancestors(conn, card.deck)?;
    path.push(card.deck);
    Ok(path)
}
