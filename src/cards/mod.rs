//! Cards filed in decks

pub mod models;
pub mod storage;

pub use models::{Card, CardUpdate, NewCard};
