//! Stashes and their card memberships

pub mod models;
pub mod storage;

pub use models::{Stash, StashUpdate};
