//! Error taxonomy shared by every storage operation

use thiserror::Error;

use crate::ids::{CardId, DeckId, StashId};
use crate::review::ReviewScope;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Deck not found: {0}")]
    DeckNotFound(DeckId),

    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Stash not found: {0}")]
    StashNotFound(StashId),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Nothing in {0} is due for review yet")]
    NoEligibleCandidates(ReviewScope),

    #[error("{0} has no cards")]
    EmptyScope(ReviewScope),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("SQLite error: {0}")]
    Transient(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidHierarchy,
    NoEligibleCandidates,
    EmptyScope,
    ConstraintViolation,
    /// Storage I/O failure; the only kind worth retrying
    Transient,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DeckNotFound(_) | Self::CardNotFound(_) | Self::StashNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidHierarchy(_) => ErrorKind::InvalidHierarchy,
            Self::NoEligibleCandidates(_) => ErrorKind::NoEligibleCandidates,
            Self::EmptyScope(_) => ErrorKind::EmptyScope,
            Self::ConstraintViolation(_) | Self::Json(_) => ErrorKind::ConstraintViolation,
            Self::Transient(_) | Self::Io(_) => ErrorKind::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    pub(crate) fn hierarchy(message: impl Into<String>) -> Self {
        Self::InvalidHierarchy(message.into())
    }

    pub(crate) fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = message.clone().unwrap_or_else(|| code.to_string());
                Self::ConstraintViolation(detail)
            }
            _ => Self::Transient(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_share_kind() {
        assert_eq!(StoreError::DeckNotFound(DeckId(1)).kind(), ErrorKind::NotFound);
        assert_eq!(StoreError::CardNotFound(CardId(1)).kind(), ErrorKind::NotFound);
        assert_eq!(StoreError::StashNotFound(StashId(1)).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_scope_outcomes_stay_distinct() {
        let scope = ReviewScope::Deck(DeckId(4));
        let empty = StoreError::EmptyScope(scope);
        let nothing_due = StoreError::NoEligibleCandidates(scope);

        assert_eq!(empty.kind(), ErrorKind::EmptyScope);
        assert_eq!(nothing_due.kind(), ErrorKind::NoEligibleCandidates);
        assert_eq!(empty.to_string(), "deck 4 has no cards");
        assert!(!nothing_due.is_transient());
    }

    #[test]
    fn test_sqlite_busy_is_transient() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(StoreError::from(err).is_transient());
    }

    #[test]
    fn test_sqlite_constraint_maps_to_constraint_violation() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_CHECK),
            Some("CHECK constraint failed: name <> ''".to_string()),
        );
        assert_eq!(StoreError::from(err).kind(), ErrorKind::ConstraintViolation);
    }
}
