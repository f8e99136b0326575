//! # rust-deckbuilder
//!
//! Card catalog and deck construction rules for a collectible card game.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: Deck legality is a pure function of the card list and
//!    a catalog lookup. No I/O, no hidden state.
//!
//! 2. **Explicit Capabilities**: The card catalog, deck store and clock are
//!    handed to the service at construction time. Nothing is global.
//!
//! 3. **Never Store an Illegal Deck**: Every mutation validates its
//!    candidate and commits it with a version-conditional write, so
//!    concurrent writers cannot jointly break a limit.
//!
//! ## Deck Rules
//!
//! - At most 40 cards
//! - At most 3 copies of any card identifier
//! - At most 1 Legend, counting copies
//! - Every card must exist in the catalog
//!
//! A finished deck also needs 40 main deck cards, 3 distinct Battlefields,
//! 1 Legend and 12 Runes. That is reported by `CompletenessReport` and never
//! blocks a write.
//!
//! ## Modules
//!
//! - `core`: Rule limits, service configuration, clock
//! - `cards`: Card identifiers, definitions, registry, catalog capability
//! - `rules`: Rule engine and validation reports
//! - `decks`: Deck records, store, and the mutation service
//! - `error`: Service error taxonomy

pub mod core;
pub mod cards;
pub mod rules;
pub mod decks;
pub mod error;

// Re-export commonly used types
pub use crate::core::{Clock, DeckRequirements, DeckRules, ManualClock, ServiceConfig, SystemClock};

pub use crate::cards::{
    CardCatalog, CardDefinition, CardId, CardRegistry, CardType, CatalogError, Color, Variant,
};

pub use crate::rules::{
    CompletenessReport, DeckValidator, ReportMode, Requirement, RequirementStatus,
    ValidationOptions, ValidationResult, Violation,
};

pub use crate::decks::{
    CommitOutcome, Deck, DeckId, DeckService, DeckStore, InMemoryDeckStore, NewDeck, StoreError,
};

pub use crate::error::{DeckError, DeckResult};
