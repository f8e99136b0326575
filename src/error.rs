//! Errors surfaced by the deck service.

use thiserror::Error;

use crate::cards::CardId;
use crate::decks::{DeckId, StoreError};
use crate::rules::ValidationResult;

/// Deck service error.
///
/// Every variant except `Store` is recoverable by the caller: adjust the
/// request and try again.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Deck name empty or whitespace.
    #[error("deck name must not be empty")]
    InvalidName,

    #[error("deck {0} not found")]
    DeckNotFound(DeckId),

    #[error("card {0} not found in catalog")]
    CardNotFound(CardId),

    /// The mutation would leave the deck illegal. Displays the first
    /// violation; the full report is carried along.
    #[error("{}", first_violation(.0))]
    ValidationFailed(ValidationResult),

    /// Lost the conditional write `attempts` times in a row.
    #[error("deck {deck_id} kept changing underneath; gave up after {attempts} attempts")]
    ConcurrentModification { deck_id: DeckId, attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn first_violation(result: &ValidationResult) -> String {
    result
        .first_message()
        .unwrap_or_else(|| "deck validation failed".to_string())
}

impl DeckError {
    /// Validation report, if this is a validation failure.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            DeckError::ValidationFailed(result) => Some(result),
            _ => None,
        }
    }

    /// Whether retrying the same request later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DeckError::ConcurrentModification { .. } | DeckError::Store(StoreError::Unavailable(_))
        )
    }
}

/// Result alias for deck service operations.
pub type DeckResult<T> = Result<T, DeckError>;
