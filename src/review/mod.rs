//! Review scheduling: which card to show next for a scope.
//!
//! A request first checks the scope's pinned pick. On a miss the sampler
//! pulls the eligible window, the ranker chooses one card and the choice is
//! pinned. Callers run [`next_card`] inside one write transaction so the
//! cache read, sampling and pin are a single step.

pub mod models;
pub mod pick_cache;
pub mod ranker;
pub mod sampler;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::cards::storage::get_card;
use crate::error::{Result, StoreError};
use crate::ledger::storage::get_score;

pub use models::{
    Candidate, PickState, RankStrategy, ReviewOptions, ReviewPick, ReviewScope, ScopeCounts,
};
pub use pick_cache::PickCache;
pub use ranker::{DecayUrgency, UrgencyFunction, UrgencyInput};

/// Resolve the next card for `scope`, reusing the pinned pick if there is one
pub fn next_card(
    conn: &Connection,
    scope: ReviewScope,
    options: &ReviewOptions,
    now: DateTime<Utc>,
    urgency: &dyn UrgencyFunction,
) -> Result<ReviewPick> {
    if options.purgatory_size == 0 {
        return Err(StoreError::constraint("purgatory size must be at least 1"));
    }
    sampler::require_scope(conn, scope)?;

    let cache = PickCache::new(conn);
    if let PickState::Picked { card, pinned_at } = cache.get(scope)? {
        return Ok(ReviewPick {
            scope,
            card: get_card(conn, card)?,
            score: get_score(conn, card)?,
            pinned_at,
            cached: true,
        });
    }

    if sampler::scope_size(conn, scope)? == 0 {
        return Err(StoreError::EmptyScope(scope));
    }

    let window = sampler::sample(conn, scope, options, now)?;
    let card = ranker::rank(&window, options.strategy, urgency, now)
        .ok_or(StoreError::NoEligibleCandidates(scope))?;

    cache.pin(scope, card, now)?;
    log::info!("Picked {} for {} ({} strategy)", card, scope, options.strategy);

    Ok(ReviewPick {
        scope,
        card: get_card(conn, card)?,
        score: get_score(conn, card)?,
        pinned_at: now,
        cached: false,
    })
}
