//! Per-card review statistics
//!
//! Every card owns exactly one [`ScoreRecord`], created with the card.
//! Each recorded outcome updates it and appends a [`ScoreSnapshot`].

pub mod models;
pub mod scoring;
pub mod storage;

pub use models::{Outcome, ScoreRecord, ScoreSnapshot};
pub use scoring::{ScoreFunction, SmoothedRatio};
