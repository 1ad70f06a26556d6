pub mod card;
pub mod deck;
pub mod review;
pub mod stash;
pub mod transfer;
