//! Eligible-candidate window for a review scope.
//!
//! A card is eligible when it has never been reviewed (its score row still
//! carries its creation timestamp) or when at least `age_of_consent` has
//! passed since its score row was last touched. Eligible cards are ordered
//! oldest-touched first, ties by card id, and only the window
//! `[purgatory_index, purgatory_index + purgatory_size)` is returned.

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection};

use super::models::{Candidate, ReviewOptions, ReviewScope, ScopeCounts};
use crate::clock::from_unix;
use crate::error::{Result, StoreError};
use crate::hierarchy::closure;
use crate::stashes::storage::require_stash;

macro_rules! never_reviewed {
    () => {
        "(cs.times_reviewed = 0 AND cs.updated_at = c.created_at)"
    };
}

const NEVER_REVIEWED: &str = never_reviewed!();

const ELIGIBLE: &str = concat!(
    "(",
    never_reviewed!(),
    " OR (:now - cs.updated_at >= :age_of_consent))"
);

const WINDOW: &str = "ORDER BY cs.updated_at ASC, c.card_id ASC
     LIMIT :purgatory_size OFFSET :purgatory_index";

/// Fail with `NotFound` if the scope's deck or stash does not exist
pub fn require_scope(conn: &Connection, scope: ReviewScope) -> Result<()> {
    match scope {
        ReviewScope::Deck(deck) => closure::require_deck(conn, deck),
        ReviewScope::Stash(stash) => require_stash(conn, stash),
    }
}

/// Number of cards in the scope, eligible or not
pub fn scope_size(conn: &Connection, scope: ReviewScope) -> Result<u64> {
    let count: i64 = match scope {
        ReviewScope::Deck(deck) => conn.query_row(
            "SELECT COUNT(1) FROM cards AS c
             JOIN deck_closure AS dc ON dc.descendant = c.deck
             WHERE dc.ancestor = :deck",
            named_params! { ":deck": deck },
            |row| row.get(0),
        )?,
        ReviewScope::Stash(stash) => conn.query_row(
            "SELECT COUNT(1) FROM stash_cards WHERE stash = :stash",
            named_params! { ":stash": stash },
            |row| row.get(0),
        )?,
    };
    Ok(count.max(0) as u64)
}

/// Join clause, filter and `:scope` value that restrict `cards AS c` to a scope
fn scope_source(scope: ReviewScope) -> (&'static str, &'static str, i64) {
    match scope {
        ReviewScope::Deck(deck) => (
            "JOIN deck_closure AS dc ON dc.descendant = c.deck",
            "dc.ancestor = :scope",
            deck.get(),
        ),
        ReviewScope::Stash(stash) => (
            "JOIN stash_cards AS sc ON sc.card = c.card_id",
            "sc.stash = :scope",
            stash.get(),
        ),
    }
}

/// Total, never-reviewed and currently eligible cards of `scope`.
///
/// `due` uses the same eligibility rule as [`sample`], so it is the size of
/// the eligible set before windowing.
pub fn scope_counts(
    conn: &Connection,
    scope: ReviewScope,
    options: &ReviewOptions,
    now: DateTime<Utc>,
) -> Result<ScopeCounts> {
    let (source, filter, id) = scope_source(scope);
    let sql = format!(
        "SELECT COUNT(1),
                COALESCE(SUM({NEVER_REVIEWED}), 0),
                COALESCE(SUM({ELIGIBLE}), 0)
         FROM cards AS c
         JOIN card_scores AS cs ON cs.card = c.card_id
         {source}
         WHERE {filter}"
    );

    let (total, new, due): (i64, i64, i64) = conn.query_row(
        &sql,
        named_params! {
            ":scope": id,
            ":now": now.timestamp(),
            ":age_of_consent": options.age_of_consent.num_seconds().max(0),
        },
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    Ok(ScopeCounts {
        total: total.max(0) as u64,
        new: new.max(0) as u64,
        due: due.max(0) as u64,
    })
}

fn read_candidate(row: &rusqlite::Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        card: row.get(0)?,
        success: row.get(1)?,
        fail: row.get(2)?,
        score: row.get(3)?,
        times_reviewed: row.get(4)?,
        last_reviewed: from_unix(row.get(5)?),
    })
}

/// Eligible cards of `scope` inside the purgatory window
pub fn sample(
    conn: &Connection,
    scope: ReviewScope,
    options: &ReviewOptions,
    now: DateTime<Utc>,
) -> Result<Vec<Candidate>> {
    if options.purgatory_size == 0 {
        return Err(StoreError::constraint("purgatory size must be at least 1"));
    }

    let (source, filter, id) = scope_source(scope);

    let sql = format!(
        "SELECT c.card_id, cs.success, cs.fail, cs.score, cs.times_reviewed, cs.updated_at
         FROM cards AS c
         JOIN card_scores AS cs ON cs.card = c.card_id
         {source}
         WHERE {filter}
           AND {ELIGIBLE}
         {WINDOW}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let candidates = stmt
        .query_map(
            named_params! {
                ":scope": id,
                ":now": now.timestamp(),
                ":age_of_consent": options.age_of_consent.num_seconds().max(0),
                ":purgatory_size": options.purgatory_size,
                ":purgatory_index": options.purgatory_index,
            },
            read_candidate,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    log::debug!(
        "Sampled {} candidate(s) from {} (window {}+{})",
        candidates.len(),
        scope,
        options.purgatory_index,
        options.purgatory_size
    );
    Ok(candidates)
}
