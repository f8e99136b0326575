//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the in-process card catalog. It provides fast
//! lookup by `CardId`, filtering by type or predicate, and enforces the
//! catalog invariants from `CardDefinition::check` on every write.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::definition::{CardDefinition, CardError, CardId, CardType};

/// Error for rejected catalog writes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card {0} is already registered")]
    Duplicate(CardId),
    #[error(transparent)]
    InvalidCard(#[from] CardError),
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use rust_deckbuilder::cards::{CardRegistry, CardDefinition, CardType};
///
/// let mut registry = CardRegistry::new();
///
/// let legend = CardDefinition::new("OGN_001", "Jinx", CardType::Legend);
/// registry.register(legend).unwrap();
///
/// let found = registry.get(&"OGN_001".into()).unwrap();
/// assert_eq!(found.name, "Jinx");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from definitions, registering each in turn.
    ///
    /// Stops at the first definition that `register` rejects.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CardDefinition>,
    {
        let mut registry = Self::new();
        for card in definitions {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a new card definition.
    ///
    /// Fails if the card breaks a catalog invariant or its ID is taken.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        card.check()?;
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::Duplicate(card.id));
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Insert or replace a card definition.
    ///
    /// Returns the previous definition, if any. Decks already holding the
    /// card are not revisited.
    pub fn upsert(&mut self, card: CardDefinition) -> Result<Option<CardDefinition>, CatalogError> {
        card.check()?;
        Ok(self.cards.insert(card.id.clone(), card))
    }

    /// Remove a card definition.
    pub fn remove(&mut self, id: &CardId) -> Option<CardDefinition> {
        self.cards.remove(id)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Color;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();

        registry
            .register(CardDefinition::new("OGN_001", "Test Card", CardType::Unit))
            .unwrap();

        let found = registry.get(&"OGN_001".into());
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Test Card");

        assert!(registry.get(&"OGN_099".into()).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = CardRegistry::new();

        registry
            .register(CardDefinition::new("OGN_001", "Card A", CardType::Unit))
            .unwrap();
        let err = registry
            .register(CardDefinition::new("OGN_001", "Card B", CardType::Unit))
            .unwrap_err();

        assert_eq!(err, CatalogError::Duplicate("OGN_001".into()));
        assert_eq!(registry.get(&"OGN_001".into()).unwrap().name, "Card A");
    }

    #[test]
    fn test_invalid_card_rejected() {
        let mut registry = CardRegistry::new();

        let unit = CardDefinition::new("OGN_002", "Two-Tone", CardType::Unit)
            .with_colors([Color::Calm, Color::Order]);
        assert!(matches!(
            registry.register(unit),
            Err(CatalogError::InvalidCard(CardError::MulticolorNonLegend { .. }))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_upsert_replaces() {
        let mut registry = CardRegistry::new();

        let previous = registry
            .upsert(CardDefinition::new("OGN_001", "Old", CardType::Unit))
            .unwrap();
        assert!(previous.is_none());

        let previous = registry
            .upsert(CardDefinition::new("OGN_001", "New", CardType::Legend))
            .unwrap();
        assert_eq!(previous.unwrap().name, "Old");
        assert_eq!(registry.get(&"OGN_001".into()).unwrap().card_type, CardType::Legend);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_by_type() {
        let registry = CardRegistry::from_definitions([
            CardDefinition::new("OGN_001", "Goblin", CardType::Unit),
            CardDefinition::new("OGN_002", "Bolt", CardType::Spell),
            CardDefinition::new("OGN_003", "Orc", CardType::Unit),
        ])
        .unwrap();

        assert_eq!(registry.find_by_type(CardType::Unit).count(), 2);
        assert_eq!(registry.find_by_type(CardType::Spell).count(), 1);
        assert_eq!(registry.find_by_type(CardType::Legend).count(), 0);
    }

    #[test]
    fn test_find_with_predicate() {
        let registry = CardRegistry::from_definitions([
            CardDefinition::new("OGN_001", "Cheap", CardType::Unit).with_cost(1),
            CardDefinition::new("OGN_002", "Expensive", CardType::Unit).with_cost(5),
        ])
        .unwrap();

        let cheap: Vec<_> = registry.find(|c| c.cost <= 2).collect();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].name, "Cheap");
    }

    #[test]
    fn test_from_definitions_surfaces_invalid_card() {
        let err = CardRegistry::from_definitions([
            CardDefinition::new("OGN_001", "Fine", CardType::Unit),
            CardDefinition::new("OGN_002", "Overcosted", CardType::Unit).with_cost(9),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::InvalidCard(CardError::CostOutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_definitions_rejects_repeated_id() {
        let err = CardRegistry::from_definitions([
            CardDefinition::new("OGN_001", "First", CardType::Unit),
            CardDefinition::new("OGN_001", "Second", CardType::Spell),
        ])
        .unwrap_err();

        assert_eq!(err, CatalogError::Duplicate("OGN_001".into()));
    }

    #[test]
    fn test_remove() {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::new("OGN_001", "Test", CardType::Gear))
            .unwrap();

        assert!(registry.contains(&"OGN_001".into()));
        assert!(registry.remove(&"OGN_001".into()).is_some());
        assert!(!registry.contains(&"OGN_001".into()));
    }
}
