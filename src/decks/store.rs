//! Deck persistence.
//!
//! `DeckStore` is the capability the deck service writes through. Every
//! write after creation is conditional on the deck's `version`: the store
//! commits only if the stored version still equals the version the caller
//! read, and bumps it on commit. This is what lets the service validate
//! and write as one unit without holding a lock across validation.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use im::Vector;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cards::CardId;

use super::deck::{Deck, DeckId};

/// Error raised by a deck store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or failing. Not retried by the service.
    #[error("deck store unavailable: {0}")]
    Unavailable(String),
    /// Insert of an identifier that already exists.
    #[error("deck {0} already exists")]
    Duplicate(DeckId),
    /// Snapshot encode/decode failure.
    #[error("deck snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result of a conditional write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Written; carries the stored deck after the write.
    Committed(Deck),
    /// The stored version moved since it was read. Nothing was written.
    Conflict,
    /// The deck no longer exists. Nothing was written.
    Missing,
}

/// Deck persistence capability.
pub trait DeckStore: Send + Sync {
    fn get(&self, id: DeckId) -> Result<Option<Deck>, StoreError>;

    /// Persist a new deck as given (version included).
    fn insert(&self, deck: Deck) -> Result<(), StoreError>;

    /// All stored decks, most recently updated first.
    fn list(&self) -> Result<Vec<Deck>, StoreError>;

    /// Remove a deck. Returns whether it existed.
    fn delete(&self, id: DeckId) -> Result<bool, StoreError>;

    /// Replace the card list if the stored version equals `expected_version`.
    fn conditional_update_card_ids(
        &self,
        id: DeckId,
        expected_version: u64,
        card_ids: Vector<CardId>,
        updated_at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError>;

    /// Replace name and description if the stored version equals
    /// `expected_version`.
    fn conditional_update_details(
        &self,
        id: DeckId,
        expected_version: u64,
        name: String,
        description: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError>;
}

/// One deck behind its own lock. `None` once the deck is deleted, so a
/// writer that fetched the slot before the delete sees `Missing`.
type Slot = Arc<Mutex<Option<Deck>>>;

/// In-process deck store.
///
/// The map of slots sits behind an `RwLock` that is only write-locked to
/// insert or delete a deck. Conditional writes take the map's read lock just
/// long enough to clone the slot, then compare and swap under that deck's
/// own mutex, so writes to different decks never wait on each other.
/// `snapshot`/`restore` move the whole store in and out of a bincode blob
/// so a host can persist it.
#[derive(Debug, Default)]
pub struct InMemoryDeckStore {
    decks: RwLock<FxHashMap<DeckId, Slot>>,
}

impl InMemoryDeckStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored decks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Encode every stored deck.
    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let mut decks = self.decks_now();
        decks.sort_by_key(|deck| deck.id);
        Ok(bincode::serialize(&decks)?)
    }

    /// Decode a snapshot into a new store.
    pub fn restore(bytes: &[u8]) -> Result<Self, StoreError> {
        let decks: Vec<Deck> = bincode::deserialize(bytes)?;
        let map = decks
            .into_iter()
            .map(|deck| (deck.id, Arc::new(Mutex::new(Some(deck)))))
            .collect();
        Ok(Self {
            decks: RwLock::new(map),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<DeckId, Slot>> {
        // Writers never panic mid-update, so a poisoned lock still guards
        // consistent data.
        self.decks.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<DeckId, Slot>> {
        self.decks.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The deck's slot. The map lock is released on return.
    fn slot(&self, id: DeckId) -> Option<Slot> {
        self.read().get(&id).cloned()
    }

    /// Clone every live deck, one slot lock at a time.
    fn decks_now(&self) -> Vec<Deck> {
        let slots: Vec<Slot> = self.read().values().cloned().collect();
        slots.iter().filter_map(|slot| lock(slot).clone()).collect()
    }

    fn compare_and_apply<F>(&self, id: DeckId, expected_version: u64, apply: F) -> CommitOutcome
    where
        F: FnOnce(&mut Deck),
    {
        let Some(slot) = self.slot(id) else {
            return CommitOutcome::Missing;
        };
        let mut guard = lock(&slot);
        let Some(deck) = guard.as_mut() else {
            return CommitOutcome::Missing;
        };
        if deck.version != expected_version {
            return CommitOutcome::Conflict;
        }
        apply(deck);
        deck.version += 1;
        CommitOutcome::Committed(deck.clone())
    }
}

fn lock(slot: &Mutex<Option<Deck>>) -> MutexGuard<'_, Option<Deck>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DeckStore for InMemoryDeckStore {
    fn get(&self, id: DeckId) -> Result<Option<Deck>, StoreError> {
        let Some(slot) = self.slot(id) else {
            return Ok(None);
        };
        let deck = lock(&slot).clone();
        Ok(deck)
    }

    fn insert(&self, deck: Deck) -> Result<(), StoreError> {
        let mut decks = self.write();
        if decks.contains_key(&deck.id) {
            return Err(StoreError::Duplicate(deck.id));
        }
        decks.insert(deck.id, Arc::new(Mutex::new(Some(deck))));
        Ok(())
    }

    fn list(&self) -> Result<Vec<Deck>, StoreError> {
        let mut decks = self.decks_now();
        decks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(decks)
    }

    fn delete(&self, id: DeckId) -> Result<bool, StoreError> {
        let Some(slot) = self.write().remove(&id) else {
            return Ok(false);
        };
        let existed = lock(&slot).take().is_some();
        Ok(existed)
    }

    fn conditional_update_card_ids(
        &self,
        id: DeckId,
        expected_version: u64,
        card_ids: Vector<CardId>,
        updated_at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        Ok(self.compare_and_apply(id, expected_version, |deck| {
            deck.card_ids = card_ids;
            deck.updated_at = updated_at;
        }))
    }

    fn conditional_update_details(
        &self,
        id: DeckId,
        expected_version: u64,
        name: String,
        description: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        Ok(self.compare_and_apply(id, expected_version, |deck| {
            deck.name = name;
            deck.description = description;
            deck.updated_at = updated_at;
        }))
    }
}
