//! Hierarchical card decks with review scheduling over an embedded SQLite store.

pub mod cards;
pub mod clock;
pub mod collection;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod ledger;
pub mod review;
pub mod stashes;
pub mod store;

pub use collection::Collection;
pub use config::Config;
pub use error::{ErrorKind, Result, StoreError};
pub use ids::{CardId, DeckId, StashId};
pub use review::{RankStrategy, ReviewOptions, ReviewScope};
