//! Score rows and their append-only history

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::models::{Outcome, ScoreRecord, ScoreSnapshot};
use super::scoring::ScoreFunction;
use crate::clock::from_unix;
use crate::error::{Result, StoreError};
use crate::ids::CardId;

pub(crate) fn read_score(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        card: row.get(0)?,
        success: row.get(1)?,
        fail: row.get(2)?,
        score: row.get(3)?,
        times_reviewed: row.get(4)?,
        updated_at: from_unix(row.get(5)?),
        changelog: row.get(6)?,
    })
}

pub fn get_score(conn: &Connection, card: CardId) -> Result<ScoreRecord> {
    conn.query_row(
        "SELECT card, success, fail, score, times_reviewed, updated_at, changelog
         FROM card_scores WHERE card = :card",
        named_params! { ":card": card },
        read_score,
    )
    .optional()?
    .ok_or(StoreError::CardNotFound(card))
}

/// Count one review and append the matching history row.
///
/// Must run inside the caller's write transaction so the two writes land
/// together.
pub fn apply_outcome(
    conn: &Connection,
    card: CardId,
    outcome: Outcome,
    note: Option<&str>,
    now: DateTime<Utc>,
    scoring: &dyn ScoreFunction,
) -> Result<ScoreRecord> {
    let current = get_score(conn, card)?;

    let (success, fail) = match outcome {
        Outcome::Pass => (current.success.saturating_add(1), current.fail),
        Outcome::Fail => (current.success, current.fail.saturating_add(1)),
    };
    let score = scoring.score(success, fail).clamp(0.0, 1.0);
    let changelog = note.unwrap_or_default();
    let now = now.timestamp();

    conn.execute(
        "UPDATE card_scores
         SET success = :success,
             fail = :fail,
             score = :score,
             times_reviewed = times_reviewed + 1,
             updated_at = :now,
             changelog = :changelog
         WHERE card = :card",
        named_params! {
            ":card": card,
            ":success": success,
            ":fail": fail,
            ":score": score,
            ":now": now,
            ":changelog": changelog,
        },
    )?;

    conn.execute(
        "INSERT INTO score_history (occurred_at, success, fail, score, changelog, card)
         VALUES (:now, :success, :fail, :score, :changelog, :card)",
        named_params! {
            ":card": card,
            ":success": success,
            ":fail": fail,
            ":score": score,
            ":now": now,
            ":changelog": changelog,
        },
    )?;

    get_score(conn, card)
}

/// Restart the card's age-of-consent wait without counting a review
pub fn touch(conn: &Connection, card: CardId, now: DateTime<Utc>) -> Result<ScoreRecord> {
    let updated = conn.execute(
        "UPDATE card_scores SET updated_at = :now WHERE card = :card",
        named_params! { ":card": card, ":now": now.timestamp() },
    )?;
    if updated == 0 {
        return Err(StoreError::CardNotFound(card));
    }
    get_score(conn, card)
}

/// History rows for a card, newest first
pub fn history(conn: &Connection, card: CardId) -> Result<Vec<ScoreSnapshot>> {
    crate::cards::storage::require_card(conn, card)?;

    let mut stmt = conn.prepare(
        "SELECT card, occurred_at, success, fail, score, changelog
         FROM score_history
         WHERE card = :card
         ORDER BY occurred_at DESC, history_id DESC",
    )?;
    let rows = stmt
        .query_map(named_params! { ":card": card }, |row| {
            Ok(ScoreSnapshot {
                card: row.get(0)?,
                occurred_at: from_unix(row.get(1)?),
                success: row.get(2)?,
                fail: row.get(3)?,
                score: row.get(4)?,
                changelog: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
