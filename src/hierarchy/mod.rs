//! Deck forest stored as a closure table
//!
//! Every deck has at most one parent. Ancestry queries read a single
//! indexed table instead of walking parent pointers.

pub mod closure;
pub mod models;

pub use closure::check_forest;
pub use models::{ClosureEdge, DeckNode, DeckUpdate, HierarchySnapshot};
