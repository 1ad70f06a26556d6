use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::models::{Stash, StashUpdate};
use crate::cards::storage::{read_card, require_card};
use crate::cards::Card;
use crate::clock::from_unix;
use crate::error::{Result, StoreError};
use crate::ids::{CardId, StashId};

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::constraint("stash name must not be empty"));
    }
    Ok(())
}

fn read_stash(row: &rusqlite::Row<'_>) -> rusqlite::Result<Stash> {
    Ok(Stash {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: from_unix(row.get(3)?),
        updated_at: from_unix(row.get(4)?),
    })
}

// ==================== Stash Operations ====================

pub fn insert_stash(
    conn: &Connection,
    name: &str,
    description: &str,
    now: DateTime<Utc>,
) -> Result<StashId> {
    validate_name(name)?;
    conn.execute(
        "INSERT INTO stashes (name, description, created_at, updated_at)
         VALUES (:name, :description, :now, :now)",
        named_params! {
            ":name": name,
            ":description": description,
            ":now": now.timestamp(),
        },
    )?;
    Ok(StashId(conn.last_insert_rowid()))
}

pub fn get_stash(conn: &Connection, id: StashId) -> Result<Stash> {
    conn.query_row(
        "SELECT stash_id, name, description, created_at, updated_at
         FROM stashes WHERE stash_id = :id",
        named_params! { ":id": id },
        read_stash,
    )
    .optional()?
    .ok_or(StoreError::StashNotFound(id))
}

pub fn require_stash(conn: &Connection, id: StashId) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM stashes WHERE stash_id = :id)",
        named_params! { ":id": id },
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::StashNotFound(id))
    }
}

pub fn list_stashes(conn: &Connection) -> Result<Vec<Stash>> {
    let mut stmt = conn.prepare(
        "SELECT stash_id, name, description, created_at, updated_at
         FROM stashes ORDER BY stash_id",
    )?;
    let stashes = stmt
        .query_map([], read_stash)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(stashes)
}

pub fn update_stash(
    conn: &Connection,
    id: StashId,
    update: &StashUpdate,
    now: DateTime<Utc>,
) -> Result<Stash> {
    if update.is_empty() {
        return Err(StoreError::constraint("stash update has no fields"));
    }
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    require_stash(conn, id)?;

    conn.execute(
        "UPDATE stashes
         SET name = COALESCE(:name, name),
             description = COALESCE(:description, description),
             updated_at = :now
         WHERE stash_id = :id",
        named_params! {
            ":id": id,
            ":name": update.name,
            ":description": update.description,
            ":now": now.timestamp(),
        },
    )?;

    get_stash(conn, id)
}

/// Delete a stash. The cards themselves are untouched.
pub fn delete_stash(conn: &Connection, id: StashId) -> Result<()> {
    let removed = conn.execute(
        "DELETE FROM stashes WHERE stash_id = :id",
        named_params! { ":id": id },
    )?;
    if removed == 0 {
        return Err(StoreError::StashNotFound(id));
    }
    Ok(())
}

// ==================== Membership Operations ====================

/// Add a card to a stash. Returns `false` if it was already a member.
pub fn add_card(conn: &Connection, stash: StashId, card: CardId, now: DateTime<Utc>) -> Result<bool> {
    require_stash(conn, stash)?;
    require_card(conn, card)?;

    let added = conn.execute(
        "INSERT INTO stash_cards (stash, card, added_at) VALUES (:stash, :card, :now)
         ON CONFLICT (stash, card) DO NOTHING",
        named_params! { ":stash": stash, ":card": card, ":now": now.timestamp() },
    )?;
    Ok(added > 0)
}

/// Remove a card from a stash. Returns `false` if it was not a member.
pub fn remove_card(conn: &Connection, stash: StashId, card: CardId) -> Result<bool> {
    require_stash(conn, stash)?;
    require_card(conn, card)?;

    let removed = conn.execute(
        "DELETE FROM stash_cards WHERE stash = :stash AND card = :card",
        named_params! { ":stash": stash, ":card": card },
    )?;
    Ok(removed > 0)
}

/// Member cards in the order they were added
pub fn stash_cards(conn: &Connection, stash: StashId) -> Result<Vec<Card>> {
    require_stash(conn, stash)?;

    let mut stmt = conn.prepare(
        "SELECT c.card_id, c.title, c.description, c.front, c.back, c.deck,
                c.created_at, c.updated_at
         FROM stash_cards AS sc
         JOIN cards AS c ON c.card_id = sc.card
         WHERE sc.stash = :stash
         ORDER BY sc.added_at, c.card_id",
    )?;
    let cards = stmt
        .query_map(named_params! { ":stash": stash }, read_card)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn stashes_for_card(conn: &Connection, card: CardId) -> Result<Vec<Stash>> {
    require_card(conn, card)?;

    let mut stmt = conn.prepare(
        "SELECT s.stash_id, s.name, s.description, s.created_at, s.updated_at
         FROM stash_cards AS sc
         JOIN stashes AS s ON s.stash_id = sc.stash
         WHERE sc.card = :card
         ORDER BY s.stash_id",
    )?;
    let stashes = stmt
        .query_map(named_params! { ":card": card }, read_stash)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(stashes)
}
