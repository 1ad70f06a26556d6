//! Table layout of a collection database.

/// Bumped whenever the layout below changes
pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA: &str = r#"
-- Deck nodes; ancestry lives in deck_closure
CREATE TABLE IF NOT EXISTS decks (
    deck_id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    CHECK (name <> '')
);

-- Every (ancestor, descendant, depth) pair implied by the deck forest
CREATE TABLE IF NOT EXISTS deck_closure (
    ancestor INTEGER NOT NULL,
    descendant INTEGER NOT NULL,
    depth INTEGER NOT NULL,
    PRIMARY KEY (ancestor, descendant),
    FOREIGN KEY (ancestor) REFERENCES decks(deck_id) ON DELETE CASCADE,
    FOREIGN KEY (descendant) REFERENCES decks(deck_id) ON DELETE CASCADE,
    CHECK (depth >= 0)
);

CREATE INDEX IF NOT EXISTS idx_deck_closure_descendant ON deck_closure(descendant, depth);

CREATE TABLE IF NOT EXISTS cards (
    card_id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    front TEXT NOT NULL DEFAULT '',
    back TEXT NOT NULL DEFAULT '',
    deck INTEGER NOT NULL,
    -- updated_at tracks content edits, not reviews
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    CHECK (title <> ''),
    FOREIGN KEY (deck) REFERENCES decks(deck_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck);

-- One row per card, created together with the card
CREATE TABLE IF NOT EXISTS card_scores (
    card INTEGER PRIMARY KEY NOT NULL,
    success INTEGER NOT NULL DEFAULT 0,
    fail INTEGER NOT NULL DEFAULT 0,
    score REAL NOT NULL DEFAULT 0.5,
    times_reviewed INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    changelog TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (card) REFERENCES cards(card_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_card_scores_updated ON card_scores(updated_at, card);

-- Append-only; rows only disappear with their card
CREATE TABLE IF NOT EXISTS score_history (
    history_id INTEGER PRIMARY KEY NOT NULL,
    occurred_at INTEGER NOT NULL,
    success INTEGER NOT NULL,
    fail INTEGER NOT NULL,
    score REAL NOT NULL,
    changelog TEXT NOT NULL DEFAULT '',
    card INTEGER NOT NULL,
    FOREIGN KEY (card) REFERENCES cards(card_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_score_history_card ON score_history(card, occurred_at DESC);

CREATE TABLE IF NOT EXISTS stashes (
    stash_id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    CHECK (name <> '')
);

CREATE TABLE IF NOT EXISTS stash_cards (
    stash INTEGER NOT NULL,
    card INTEGER NOT NULL,
    added_at INTEGER NOT NULL,
    PRIMARY KEY (stash, card),
    FOREIGN KEY (stash) REFERENCES stashes(stash_id) ON DELETE CASCADE,
    FOREIGN KEY (card) REFERENCES cards(card_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_stash_cards_card ON stash_cards(card);

-- Pinned "next card" per scope
CREATE TABLE IF NOT EXISTS current_pick_by_deck (
    deck INTEGER PRIMARY KEY NOT NULL,
    card INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (deck) REFERENCES decks(deck_id) ON DELETE CASCADE,
    FOREIGN KEY (card) REFERENCES cards(card_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS current_pick_by_stash (
    stash INTEGER PRIMARY KEY NOT NULL,
    card INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (stash) REFERENCES stashes(stash_id) ON DELETE CASCADE,
    FOREIGN KEY (card) REFERENCES cards(card_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_current_pick_by_deck_card ON current_pick_by_deck(card);
CREATE INDEX IF NOT EXISTS idx_current_pick_by_stash_card ON current_pick_by_stash(card);
"#;
