//! Decks: records, persistence, and the mutation service.
//!
//! ## Key Types
//!
//! - `Deck` / `DeckId`: Stored deck record
//! - `DeckStore`: Persistence capability with version-conditional writes
//! - `InMemoryDeckStore`: In-process store with bincode snapshots
//! - `DeckService`: Create/add/remove/check, never committing an illegal deck

pub mod deck;
pub mod service;
pub mod store;

pub use deck::{Deck, DeckId};
pub use service::{DeckService, NewDeck};
pub use store::{CommitOutcome, DeckStore, InMemoryDeckStore, StoreError};
