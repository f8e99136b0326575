//! Card catalog capability.
//!
//! The rule engine and the deck service never reach for a global catalog.
//! They are handed something implementing `CardCatalog` at construction
//! time, which makes test doubles trivial.

use std::sync::{Arc, RwLock};

use super::definition::{CardId, CardType};
use super::registry::CardRegistry;

/// Read-only card lookup used by deck validation.
pub trait CardCatalog: Send + Sync {
    /// Resolve a card's type, or `None` if the catalog has no such card.
    fn card_type(&self, id: &CardId) -> Option<CardType>;

    /// Check whether the catalog knows this card.
    fn contains(&self, id: &CardId) -> bool {
        self.card_type(id).is_some()
    }
}

impl CardCatalog for CardRegistry {
    fn card_type(&self, id: &CardId) -> Option<CardType> {
        self.get(id).map(|card| card.card_type)
    }
}

/// Editable catalog. Edits made through the lock are visible to every
/// later lookup, so decks can drift out of legality underfoot.
impl CardCatalog for RwLock<CardRegistry> {
    fn card_type(&self, id: &CardId) -> Option<CardType> {
        // A poisoned lock still holds a consistent map; registry writes
        // never panic halfway through an insert.
        let registry = self.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.card_type(id)
    }
}

impl<T: CardCatalog + ?Sized> CardCatalog for &T {
    fn card_type(&self, id: &CardId) -> Option<CardType> {
        (**self).card_type(id)
    }
}

impl<T: CardCatalog + ?Sized> CardCatalog for Arc<T> {
    fn card_type(&self, id: &CardId) -> Option<CardType> {
        (**self).card_type(id)
    }
}
