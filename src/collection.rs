//! A card collection backed by one SQLite file.
//!
//! [`Collection`] is the entry point for every operation. Each mutating
//! method runs in its own write transaction: it either commits completely
//! or leaves the database untouched.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;

use crate::cards::storage as card_store;
use crate::cards::{Card, CardUpdate, NewCard};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::closure;
use crate::hierarchy::{DeckNode, DeckUpdate, HierarchySnapshot};
use crate::ids::{CardId, DeckId, StashId};
use crate::ledger::storage as ledger_store;
use crate::ledger::{Outcome, ScoreFunction, ScoreRecord, ScoreSnapshot, SmoothedRatio};
use crate::review::{
    self, sampler, Candidate, DecayUrgency, PickCache, PickState, ReviewOptions, ReviewPick,
    ReviewScope, ScopeCounts, UrgencyFunction,
};
use crate::stashes::storage as stash_store;
use crate::stashes::{Stash, StashUpdate};
use crate::store;

pub struct Collection {
    conn: Connection,
    clock: Arc<dyn Clock>,
    scoring: Arc<dyn ScoreFunction>,
    urgency: Arc<dyn UrgencyFunction>,
    review: ReviewOptions,
}

impl Collection {
    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            clock: Arc::new(SystemClock::new()),
            scoring: Arc::new(SmoothedRatio::default()),
            urgency: Arc::new(DecayUrgency::default()),
            review: ReviewOptions::default(),
        }
    }

    /// Open (or create) a collection file with default settings
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_connection(store::open(
            path,
            store::DEFAULT_BUSY_TIMEOUT,
        )?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(store::open_in_memory()?))
    }

    /// Open the collection `config` points at inside `data_dir`
    pub fn from_config(config: &Config, data_dir: &Path) -> Result<Self> {
        let conn = store::open(&config.database_path(data_dir), config.busy_timeout())?;
        let ratio = config.scoring();
        Ok(Self::from_connection(conn)
            .with_scoring(ratio)
            .with_urgency(DecayUrgency { ratio })
            .with_review_options(config.review_options()))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Share a clock the caller keeps a handle to
    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_scoring(mut self, scoring: impl ScoreFunction + 'static) -> Self {
        self.scoring = Arc::new(scoring);
        self
    }

    pub fn with_urgency(mut self, urgency: impl UrgencyFunction + 'static) -> Self {
        self.urgency = Arc::new(urgency);
        self
    }

    pub fn with_review_options(mut self, options: ReviewOptions) -> Self {
        self.review = options;
        self
    }

    pub fn review_options(&self) -> &ReviewOptions {
        &self.review
    }

    // ==================== Deck Operations ====================

    /// Create a deck, optionally directly under `parent`
    pub fn create_deck(
        &mut self,
        name: &str,
        description: &str,
        parent: Option<DeckId>,
    ) -> Result<DeckId> {
        let tx = store::write_tx(&mut self.conn)?;
        let id = closure::insert_deck(&tx, name, description)?;
        if let Some(parent) = parent {
            closure::attach_child(&tx, parent, id)?;
        }
        tx.commit()?;

        match parent {
            Some(parent) => log::info!("Created {} under {}", id, parent),
            None => log::info!("Created {}", id),
        }
        Ok(id)
    }

    pub fn get_deck(&self, id: DeckId) -> Result<DeckNode> {
        closure::get_deck(&self.conn, id)
    }

    pub fn list_decks(&self) -> Result<Vec<DeckNode>> {
        closure::list_decks(&self.conn)
    }

    pub fn update_deck(&mut self, id: DeckId, update: &DeckUpdate) -> Result<DeckNode> {
        let tx = store::write_tx(&mut self.conn)?;
        let deck = closure::update_deck(&tx, id, update)?;
        tx.commit()?;
        Ok(deck)
    }

    /// Delete a deck, every deck below it, and all of their cards
    pub fn delete_deck(&mut self, id: DeckId) -> Result<Vec<DeckId>> {
        let tx = store::write_tx(&mut self.conn)?;
        let removed = closure::delete_subtree(&tx, id)?;
        tx.commit()?;

        log::info!("Deleted {} and {} deck(s) below it", id, removed.len() - 1);
        Ok(removed)
    }

    /// Attach a parentless deck under `parent`
    pub fn attach_child(&mut self, parent: DeckId, child: DeckId) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        closure::attach_child(&tx, parent, child)?;
        tx.commit()?;

        log::info!("Attached {} under {}", child, parent);
        Ok(())
    }

    /// Relocate `child` with its whole subtree beneath `new_parent`
    pub fn move_subtree(&mut self, child: DeckId, new_parent: DeckId) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        if closure::move_subtree(&tx, child, new_parent)? {
            PickCache::new(&tx).prune_stale_deck_picks()?;
            tx.commit()?;
            log::info!("Moved {} under {}", child, new_parent);
        }
        Ok(())
    }

    /// Cut `child` loose from its parent, making it a root
    pub fn detach_subtree(&mut self, child: DeckId) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        if closure::detach_subtree(&tx, child)? {
            PickCache::new(&tx).prune_stale_deck_picks()?;
            tx.commit()?;
            log::info!("Detached {}", child);
        }
        Ok(())
    }

    pub fn ancestors(&self, node: DeckId) -> Result<Vec<DeckId>> {
        closure::ancestors(&self.conn, node)
    }

    pub fn children(&self, node: DeckId) -> Result<Vec<DeckId>> {
        closure::children(&self.conn, node)
    }

    pub fn descendants(&self, node: DeckId) -> Result<Vec<DeckId>> {
        closure::descendants(&self.conn, node)
    }

    pub fn parent(&self, node: DeckId) -> Result<Option<DeckId>> {
        closure::parent(&self.conn, node)
    }

    pub fn is_descendant(&self, ancestor: DeckId, node: DeckId) -> Result<bool> {
        closure::require_deck(&self.conn, ancestor)?;
        closure::require_deck(&self.conn, node)?;
        closure::is_descendant(&self.conn, ancestor, node)
    }

    pub fn roots(&self) -> Result<Vec<DeckNode>> {
        closure::roots(&self.conn)
    }

    pub fn export_hierarchy(&self) -> Result<HierarchySnapshot> {
        closure::export(&self.conn)
    }

    /// Load a deck forest into a collection that has no decks yet
    pub fn import_hierarchy(&mut self, snapshot: &HierarchySnapshot) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        closure::import(&tx, snapshot)?;
        tx.commit()?;

        log::info!(
            "Imported {} deck(s) and {} closure edge(s)",
            snapshot.decks.len(),
            snapshot.edges.len()
        );
        Ok(())
    }

    /// Re-validate the stored closure table against the forest rules
    pub fn check_hierarchy(&self) -> Result<()> {
        let snapshot = closure::export(&self.conn)?;
        closure::check_forest(&snapshot.decks, &snapshot.edges)
    }

    // ==================== Card Operations ====================

    pub fn create_card(&mut self, card: &NewCard) -> Result<CardId> {
        let now = self.clock.now();
        let initial = self.scoring.score(0, 0);

        let tx = store::write_tx(&mut self.conn)?;
        let id = card_store::insert_card(&tx, card, now, initial)?;
        tx.commit()?;

        log::debug!("Created {} in {}", id, card.deck);
        Ok(id)
    }

    pub fn get_card(&self, id: CardId) -> Result<Card> {
        card_store::get_card(&self.conn, id)
    }

    pub fn update_card(&mut self, id: CardId, update: &CardUpdate) -> Result<Card> {
        let now = self.clock.now();

        let tx = store::write_tx(&mut self.conn)?;
        let (card, moved) = card_store::update_card(&tx, id, update, now)?;
        if moved {
            PickCache::new(&tx).prune_stale_deck_picks()?;
        }
        tx.commit()?;

        if moved {
            log::info!("Moved {} to {}", id, card.deck);
        }
        Ok(card)
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        card_store::delete_card(&tx, id)?;
        tx.commit()?;

        log::info!("Deleted {}", id);
        Ok(())
    }

    pub fn cards_in_deck(&self, deck: DeckId, recursive: bool) -> Result<Vec<Card>> {
        card_store::cards_in_deck(&self.conn, deck, recursive)
    }

    /// Root-first list of decks leading to the card's own deck
    pub fn deck_path(&self, card: CardId) -> Result<Vec<DeckId>> {
        card_store::deck_path(&self.conn, card)
    }

    // ==================== Stash Operations ====================

    pub fn create_stash(&mut self, name: &str, description: &str) -> Result<StashId> {
        let now = self.clock.now();

        let tx = store::write_tx(&mut self.conn)?;
        let id = stash_store::insert_stash(&tx, name, description, now)?;
        tx.commit()?;

        log::info!("Created {}", id);
        Ok(id)
    }

    pub fn get_stash(&self, id: StashId) -> Result<Stash> {
        stash_store::get_stash(&self.conn, id)
    }

    pub fn list_stashes(&self) -> Result<Vec<Stash>> {
        stash_store::list_stashes(&self.conn)
    }

    pub fn update_stash(&mut self, id: StashId, update: &StashUpdate) -> Result<Stash> {
        let now = self.clock.now();

        let tx = store::write_tx(&mut self.conn)?;
        let stash = stash_store::update_stash(&tx, id, update, now)?;
        tx.commit()?;
        Ok(stash)
    }

    pub fn delete_stash(&mut self, id: StashId) -> Result<()> {
        let tx = store::write_tx(&mut self.conn)?;
        stash_store::delete_stash(&tx, id)?;
        tx.commit()?;

        log::info!("Deleted {}", id);
        Ok(())
    }

    /// Returns `false` if the card was already in the stash
    pub fn add_to_stash(&mut self, stash: StashId, card: CardId) -> Result<bool> {
        let now = self.clock.now();

        let tx = store::write_tx(&mut self.conn)?;
        let added = stash_store::add_card(&tx, stash, card, now)?;
        tx.commit()?;
        Ok(added)
    }

    /// Returns `false` if the card was not in the stash
    pub fn remove_from_stash(&mut self, stash: StashId, card: CardId) -> Result<bool> {
        let tx = store::write_tx(&mut self.conn)?;
        let removed = stash_store::remove_card(&tx, stash, card)?;
        if removed {
            PickCache::new(&tx).invalidate_stash_card(stash, card)?;
        }
        tx.commit()?;
        Ok(removed)
    }

    pub fn stash_cards(&self, stash: StashId) -> Result<Vec<Card>> {
        stash_store::stash_cards(&self.conn, stash)
    }

    pub fn stashes_for_card(&self, card: CardId) -> Result<Vec<Stash>> {
        stash_store::stashes_for_card(&self.conn, card)
    }

    // ==================== Score Operations ====================

    pub fn score(&self, card: CardId) -> Result<ScoreRecord> {
        ledger_store::get_score(&self.conn, card)
    }

    /// Count one review of `card` and release every pick pinned to it
    pub fn record_outcome(
        &mut self,
        card: CardId,
        succeeded: bool,
        note: Option<&str>,
    ) -> Result<ScoreRecord> {
        let now = self.clock.now();
        let outcome = Outcome::from(succeeded);

        let tx = store::write_tx(&mut self.conn)?;
        let record =
            ledger_store::apply_outcome(&tx, card, outcome, note, now, self.scoring.as_ref())?;
        PickCache::new(&tx).invalidate_card(card)?;
        tx.commit()?;

        log::info!(
            "Recorded {:?} for {} (score {:.3}, {} review(s))",
            outcome,
            card,
            record.score,
            record.times_reviewed
        );
        Ok(record)
    }

    /// Put a card back without reviewing it.
    ///
    /// Counters and history stay as they are; the card waits out the age of
    /// consent like a reviewed one.
    pub fn skip_card(&mut self, card: CardId) -> Result<ScoreRecord> {
        let now = self.clock.now();

        let tx = store::write_tx(&mut self.conn)?;
        let record = ledger_store::touch(&tx, card, now)?;
        PickCache::new(&tx).invalidate_card(card)?;
        tx.commit()?;

        log::info!("Skipped {}", card);
        Ok(record)
    }

    /// Score snapshots of `card`, newest first
    pub fn history(&self, card: CardId) -> Result<Vec<ScoreSnapshot>> {
        ledger_store::history(&self.conn, card)
    }

    // ==================== Review Operations ====================

    /// Eligible window for `scope` using the collection's review options
    pub fn sample(&self, scope: ReviewScope) -> Result<Vec<Candidate>> {
        self.sample_with(scope, &self.review)
    }

    pub fn sample_with(&self, scope: ReviewScope, options: &ReviewOptions) -> Result<Vec<Candidate>> {
        sampler::require_scope(&self.conn, scope)?;
        sampler::sample(&self.conn, scope, options, self.clock.now())
    }

    /// Total, new and due card counts of `scope` under the collection's review options
    pub fn review_counts(&self, scope: ReviewScope) -> Result<ScopeCounts> {
        sampler::require_scope(&self.conn, scope)?;
        sampler::scope_counts(&self.conn, scope, &self.review, self.clock.now())
    }

    /// The card to review next in `scope`
    pub fn next_card(&mut self, scope: ReviewScope) -> Result<ReviewPick> {
        let options = self.review;
        self.next_card_with(scope, &options)
    }

    pub fn next_card_with(
        &mut self,
        scope: ReviewScope,
        options: &ReviewOptions,
    ) -> Result<ReviewPick> {
        let now = self.clock.now();
        let urgency = Arc::clone(&self.urgency);

        let tx = store::write_tx(&mut self.conn)?;
        let pick = review::next_card(&tx, scope, options, now, urgency.as_ref())?;
        tx.commit()?;
        Ok(pick)
    }

    pub fn current_pick(&self, scope: ReviewScope) -> Result<PickState> {
        sampler::require_scope(&self.conn, scope)?;
        PickCache::new(&self.conn).get(scope)
    }

    /// Forget the pinned pick of `scope`. Returns whether one existed.
    pub fn invalidate_pick(&mut self, scope: ReviewScope) -> Result<bool> {
        let tx = store::write_tx(&mut self.conn)?;
        sampler::require_scope(&tx, scope)?;
        let removed = PickCache::new(&tx).invalidate_scope(scope)?;
        tx.commit()?;

        if removed {
            log::debug!("Invalidated pick for {}", scope);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{ErrorKind, StoreError};
    use crate::review::{RankStrategy, UrgencyInput};

    const START: i64 = 1_700_000_000;

    fn collection() -> (Collection, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_unix(START));
        let shared: Arc<dyn Clock> = clock.clone();
        let collection = Collection::open_in_memory()
            .unwrap()
            .with_shared_clock(shared);
        (collection, clock)
    }

    fn add_cards(c: &mut Collection, deck: DeckId, titles: &[&str]) -> Vec<CardId> {
        titles
            .iter()
            .map(|title| c.create_card(&NewCard::new(deck, *title)).unwrap())
            .collect()
    }

    fn age_options(age: Duration) -> ReviewOptions {
        ReviewOptions {
            age_of_consent: age,
            purgatory_size: 3,
            purgatory_index: 0,
            strategy: RankStrategy::Age,
        }
    }

    #[test]
    fn test_reviewed_card_is_not_picked_again() {
        let (mut c, clock) = collection();
        let deck = c.create_deck("A", "", None).unwrap();
        let cards = add_cards(&mut c, deck, &["X", "Y", "Z"]);
        let options = age_options(Duration::minutes(10));

        let first = c.next_card_with(ReviewScope::Deck(deck), &options).unwrap();
        assert!(cards.contains(&first.card.id));
        assert!(!first.cached);

        c.record_outcome(first.card.id, true, None).unwrap();
        clock.advance(Duration::seconds(1));

        let second = c.next_card_with(ReviewScope::Deck(deck), &options).unwrap();
        assert_ne!(second.card.id, first.card.id);
        assert!(cards.contains(&second.card.id));
    }

    #[test]
    fn test_empty_deck_is_empty_scope() {
        let (mut c, _) = collection();
        let deck = c.create_deck("B", "", None).unwrap();

        let err = c.next_card(ReviewScope::Deck(deck)).unwrap_err();
        assert!(matches!(err, StoreError::EmptyScope(ReviewScope::Deck(d)) if d == deck));
    }

    #[test]
    fn test_recently_reviewed_deck_has_nothing_due() {
        let (mut c, clock) = collection();
        let deck = c.create_deck("C", "", None).unwrap();
        for card in add_cards(&mut c, deck, &["one", "two"]) {
            c.record_outcome(card, true, None).unwrap();
        }
        clock.advance(Duration::hours(3));

        let err = c
            .next_card_with(ReviewScope::Deck(deck), &age_options(Duration::days(1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoEligibleCandidates);

        clock.advance(Duration::days(1));
        assert!(c
            .next_card_with(ReviewScope::Deck(deck), &age_options(Duration::days(1)))
            .is_ok());
    }

    #[test]
    fn test_window_past_end_has_nothing_due() {
        let (mut c, _) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        add_cards(&mut c, deck, &["only"]);

        let options = ReviewOptions {
            purgatory_index: 5,
            ..Default::default()
        };
        let err = c.next_card_with(ReviewScope::Deck(deck), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoEligibleCandidates);
    }

    #[test]
    fn test_repeated_next_card_is_stable() {
        let (mut c, clock) = collection();
        let deck = c.create_deck("Stable", "", None).unwrap();
        add_cards(&mut c, deck, &["p", "q", "r", "s"]);
        let scope = ReviewScope::Deck(deck);

        let first = c.next_card(scope).unwrap();
        for _ in 0..3 {
            clock.advance(Duration::hours(2));
            let again = c.next_card(scope).unwrap();
            assert_eq!(again.card.id, first.card.id);
            assert_eq!(again.pinned_at, first.pinned_at);
            assert!(again.cached);
        }
        assert_eq!(c.current_pick(scope).unwrap().card(), Some(first.card.id));
    }

    #[test]
    fn test_outcome_releases_only_that_cards_picks() {
        let (mut c, _) = collection();
        let top = c.create_deck("Top", "", None).unwrap();
        let sub = c.create_deck("Sub", "", Some(top)).unwrap();
        let cards = add_cards(&mut c, sub, &["a", "b"]);
        let (a, b) = (cards[0], cards[1]);
        let stash = c.create_stash("S", "").unwrap();
        c.add_to_stash(stash, b).unwrap();

        let options = age_options(Duration::minutes(10));
        let deck_pick = c.next_card_with(ReviewScope::Deck(top), &options).unwrap();
        assert_eq!(deck_pick.card.id, a);
        c.next_card_with(ReviewScope::Deck(sub), &options).unwrap();
        c.next_card_with(ReviewScope::Stash(stash), &options).unwrap();

        c.record_outcome(a, false, Some("forgot")).unwrap();

        assert_eq!(c.current_pick(ReviewScope::Deck(top)).unwrap(), PickState::Empty);
        assert_eq!(c.current_pick(ReviewScope::Deck(sub)).unwrap(), PickState::Empty);
        assert_eq!(c.current_pick(ReviewScope::Stash(stash)).unwrap().card(), Some(b));
    }

    #[test]
    fn test_stash_removal_releases_pick() {
        let (mut c, _) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        let cards = add_cards(&mut c, deck, &["a", "b"]);
        let stash = c.create_stash("S", "").unwrap();
        for card in &cards {
            c.add_to_stash(stash, *card).unwrap();
        }
        let scope = ReviewScope::Stash(stash);

        let pick = c.next_card(scope).unwrap();
        c.remove_from_stash(stash, pick.card.id).unwrap();

        assert_eq!(c.current_pick(scope).unwrap(), PickState::Empty);
        let next = c.next_card(scope).unwrap();
        assert_ne!(next.card.id, pick.card.id);
    }

    #[test]
    fn test_moving_deck_out_of_scope_releases_pick() {
        let (mut c, _) = collection();
        let left = c.create_deck("Left", "", None).unwrap();
        let right = c.create_deck("Right", "", None).unwrap();
        let inner = c.create_deck("Inner", "", Some(left)).unwrap();
        let card = add_cards(&mut c, inner, &["moving"])[0];

        assert_eq!(c.next_card(ReviewScope::Deck(left)).unwrap().card.id, card);
        c.next_card(ReviewScope::Deck(inner)).unwrap();

        c.move_subtree(inner, right).unwrap();

        assert_eq!(c.current_pick(ReviewScope::Deck(left)).unwrap(), PickState::Empty);
        assert_eq!(c.current_pick(ReviewScope::Deck(inner)).unwrap().card(), Some(card));
        assert!(matches!(
            c.next_card(ReviewScope::Deck(left)),
            Err(StoreError::EmptyScope(_))
        ));
    }

    #[test]
    fn test_deleting_card_releases_pick() {
        let (mut c, _) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        let cards = add_cards(&mut c, deck, &["a", "b"]);
        let scope = ReviewScope::Deck(deck);

        let pick = c.next_card(scope).unwrap();
        c.delete_card(pick.card.id).unwrap();

        assert_eq!(c.current_pick(scope).unwrap(), PickState::Empty);
        let other = cards.iter().find(|id| **id != pick.card.id).copied();
        assert_eq!(Some(c.next_card(scope).unwrap().card.id), other);
    }

    #[test]
    fn test_skip_defers_card_without_counting() {
        let (mut c, clock) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        let cards = add_cards(&mut c, deck, &["a", "b"]);
        clock.advance(Duration::seconds(5));
        let scope = ReviewScope::Deck(deck);

        let pick = c.next_card(scope).unwrap();
        let record = c.skip_card(pick.card.id).unwrap();

        assert_eq!(record.times_reviewed, 0);
        assert!(c.history(pick.card.id).unwrap().is_empty());
        let next = c.next_card(scope).unwrap();
        assert_ne!(next.card.id, pick.card.id);
        assert!(cards.contains(&next.card.id));
    }

    #[test]
    fn test_record_outcome_appends_history_atomically() {
        let (mut c, clock) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        let card = add_cards(&mut c, deck, &["a"])[0];

        let before = c.score(card).unwrap();
        assert_eq!(before.score, 0.5);

        clock.advance(Duration::minutes(1));
        let after = c.record_outcome(card, true, Some("easy")).unwrap();
        assert_eq!(after.success, before.success + 1);
        assert_eq!(after.fail, before.fail);
        assert_eq!(after.times_reviewed, before.times_reviewed + 1);

        let history = c.history(card).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, after.score);
        assert_eq!(history[0].occurred_at, after.updated_at);

        assert!(c.record_outcome(CardId(999), true, None).is_err());
        assert_eq!(c.history(card).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_create_under_unknown_parent_rolls_back() {
        let (mut c, _) = collection();
        let err = c.create_deck("Orphan", "", Some(DeckId(404))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(c.list_decks().unwrap().is_empty());
    }

    #[test]
    fn test_delete_deck_removes_subtree_and_cards() {
        let (mut c, _) = collection();
        let top = c.create_deck("Top", "", None).unwrap();
        let sub = c.create_deck("Sub", "", Some(top)).unwrap();
        let keep = c.create_deck("Keep", "", None).unwrap();
        let doomed = add_cards(&mut c, sub, &["gone"])[0];
        let kept = add_cards(&mut c, keep, &["stays"])[0];

        let removed = c.delete_deck(top).unwrap();
        assert_eq!(removed, vec![top, sub]);
        assert!(matches!(c.get_card(doomed), Err(StoreError::CardNotFound(_))));
        assert!(c.get_card(kept).is_ok());
        c.check_hierarchy().unwrap();
    }

    #[test]
    fn test_deck_path_follows_moves() {
        let (mut c, _) = collection();
        let a = c.create_deck("a", "", None).unwrap();
        let b = c.create_deck("b", "", Some(a)).unwrap();
        let other = c.create_deck("other", "", None).unwrap();
        let card = add_cards(&mut c, b, &["card"])[0];

        assert_eq!(c.deck_path(card).unwrap(), vec![a, b]);
        c.move_subtree(b, other).unwrap();
        assert_eq!(c.deck_path(card).unwrap(), vec![other, b]);
        c.detach_subtree(b).unwrap();
        assert_eq!(c.deck_path(card).unwrap(), vec![b]);
    }

    #[test]
    fn test_hierarchy_export_import_round_trip() {
        let (mut source, _) = collection();
        let root = source.create_deck("root", "", None).unwrap();
        let mut level = vec![root];
        for depth in 1..4 {
            let mut next = Vec::new();
            for parent in &level {
                for i in 0..3 {
                    let name = format!("d{}-{}-{}", depth, parent.get(), i);
                    next.push(source.create_deck(&name, "", Some(*parent)).unwrap());
                }
            }
            level = next;
        }
        let snapshot = source.export_hierarchy().unwrap();
        assert_eq!(snapshot.decks.len(), 1 + 3 + 9 + 27);

        let json = snapshot.to_json().unwrap();
        let (mut target, _) = collection();
        target
            .import_hierarchy(&HierarchySnapshot::from_json(&json).unwrap())
            .unwrap();

        for deck in &snapshot.decks {
            assert_eq!(
                source.ancestors(deck.id).unwrap(),
                target.ancestors(deck.id).unwrap()
            );
            assert_eq!(
                source.children(deck.id).unwrap(),
                target.children(deck.id).unwrap()
            );
        }
        assert_eq!(target.export_hierarchy().unwrap(), snapshot);

        // A second import would collide with the decks now present
        let err = target.import_hierarchy(&snapshot).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_import_rejects_broken_forest() {
        let (mut source, _) = collection();
        let a = source.create_deck("a", "", None).unwrap();
        source.create_deck("b", "", Some(a)).unwrap();
        let mut snapshot = source.export_hierarchy().unwrap();
        snapshot.edges.retain(|edge| edge.depth == 0);
        snapshot.edges.push(crate::hierarchy::ClosureEdge {
            ancestor: a,
            descendant: a,
            depth: 1,
        });

        let (mut target, _) = collection();
        let err = target.import_hierarchy(&snapshot).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);
        assert!(target.list_decks().unwrap().is_empty());

        assert_eq!(
            HierarchySnapshot::from_json("{ not json").unwrap_err().kind(),
            ErrorKind::ConstraintViolation
        );
    }

    #[test]
    fn test_card_update_move_prunes_deck_pick() {
        let (mut c, _) = collection();
        let left = c.create_deck("Left", "", None).unwrap();
        let right = c.create_deck("Right", "", None).unwrap();
        let card = add_cards(&mut c, left, &["card"])[0];
        c.next_card(ReviewScope::Deck(left)).unwrap();

        let moved = c
            .update_card(
                card,
                &CardUpdate {
                    deck: Some(right),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.deck, right);
        assert_eq!(c.current_pick(ReviewScope::Deck(left)).unwrap(), PickState::Empty);
    }

    #[test]
    fn test_invalidate_pick_forces_resample() {
        let (mut c, _) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        add_cards(&mut c, deck, &["a"]);
        let scope = ReviewScope::Deck(deck);

        c.next_card(scope).unwrap();
        assert!(c.invalidate_pick(scope).unwrap());
        assert!(!c.invalidate_pick(scope).unwrap());
        assert!(!c.next_card(scope).unwrap().cached);

        let err = c.invalidate_pick(ReviewScope::Stash(StashId(3))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_sample_respects_window() {
        let (mut c, _) = collection();
        let deck = c.create_deck("D", "", None).unwrap();
        add_cards(&mut c, deck, &["a", "b", "c", "d", "e"]);

        let options = ReviewOptions {
            purgatory_size: 2,
            ..Default::default()
        };
        let window = c.sample_with(ReviewScope::Deck(deck), &options).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(c.sample(ReviewScope::Deck(deck)).unwrap().len(), 5);
    }

    #[test]
    fn test_is_descendant_of_unknown_deck_is_not_found() {
        let (mut c, _) = collection();
        let deck = c.create_deck("Known", "", None).unwrap();

        assert!(c.is_descendant(deck, deck).unwrap());
        let err = c.is_descendant(DeckId(99), deck).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = c.is_descendant(deck, DeckId(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_review_counts_track_reviews() {
        let (c, clock) = collection();
        let mut c = c.with_review_options(age_options(Duration::minutes(10)));
        let top = c.create_deck("Top", "", None).unwrap();
        let sub = c.create_deck("Sub", "", Some(top)).unwrap();
        let cards = add_cards(&mut c, top, &["X", "Y"]);
        add_cards(&mut c, sub, &["Z"]);
        let stash = c.create_stash("S", "").unwrap();
        c.add_to_stash(stash, cards[0]).unwrap();

        clock.advance(Duration::seconds(1));
        c.record_outcome(cards[0], true, None).unwrap();

        let counts = c.review_counts(ReviewScope::Deck(top)).unwrap();
        assert_eq!(counts, ScopeCounts { total: 3, new: 2, due: 2 });
        let counts = c.review_counts(ReviewScope::Stash(stash)).unwrap();
        assert_eq!(counts, ScopeCounts { total: 1, new: 0, due: 0 });

        clock.advance(Duration::minutes(10));
        let counts = c.review_counts(ReviewScope::Stash(stash)).unwrap();
        assert_eq!(counts.due, 1);

        let err = c.review_counts(ReviewScope::Deck(DeckId(99))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_config_prior_reaches_urgency() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.scoring.prior = 1.0;

        let c = Collection::from_config(&config, temp.path()).unwrap();
        let input = UrgencyInput {
            success: 0,
            fail: 0,
            elapsed_secs: 0,
            times_reviewed: 0,
        };
        let expected = DecayUrgency {
            ratio: SmoothedRatio { prior: 1.0 },
        };
        assert_eq!(c.urgency.urgency(&input), expected.urgency(&input));

        let skewed = UrgencyInput { success: 1, ..input };
        assert_eq!(c.urgency.urgency(&skewed), expected.urgency(&skewed));
        assert_ne!(
            c.urgency.urgency(&skewed),
            DecayUrgency::default().urgency(&skewed)
        );
    }

    #[test]
    fn test_open_from_config_on_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.review.strategy = RankStrategy::None;

        {
            let mut c = Collection::from_config(&config, temp.path()).unwrap();
            c.create_deck("Persisted", "", None).unwrap();
            assert_eq!(c.review_options().strategy, RankStrategy::None);
        }

        let c = Collection::open(&config.database_path(temp.path())).unwrap();
        assert_eq!(c.roots().unwrap()[0].name, "Persisted");
    }
}
