//! Deck records.
//!
//! A `Deck` is a named, ordered list of card identifiers. Order is
//! insertion order and only matters for display; the rules treat the list
//! as a multiset.
//!
//! `card_ids` is an `im::Vector`, so handing out a snapshot of a stored
//! deck or building a candidate list from it is O(1) until it diverges.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::CardId;

/// Opaque deck identifier, assigned at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub Uuid);

impl DeckId {
    /// Allocate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn raw(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DeckId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Stored deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,

    /// Non-empty display name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub card_ids: Vector<CardId>,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every committed mutation.
    pub updated_at: DateTime<Utc>,

    /// Write counter used for conditional updates. Starts at 0 and is bumped
    /// by the store on every committed write.
    pub version: u64,
}

impl Deck {
    /// Create a deck record stamped with `now` for both timestamps.
    #[must_use]
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        card_ids: impl IntoIterator<Item = CardId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            card_ids: card_ids.into_iter().collect(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Number of cards, counting copies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    /// Copies of `card_id` in the deck.
    #[must_use]
    pub fn count_of(&self, card_id: &CardId) -> usize {
        self.card_ids.iter().filter(|id| *id == card_id).count()
    }

    #[must_use]
    pub fn contains(&self, card_id: &CardId) -> bool {
        self.card_ids.contains(card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_new_deck_timestamps_match() {
        let deck = Deck::new(DeckId::new_v4(), "Aggro", Vec::<CardId>::new(), now());
        assert_eq!(deck.created_at, deck.updated_at);
        assert_eq!(deck.version, 0);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_counts() {
        let ids: Vec<CardId> = ["OGN_001", "OGN_002", "OGN_001"]
            .into_iter()
            .map(CardId::from)
            .collect();
        let deck = Deck::new(DeckId::new_v4(), "Counts", ids, now());

        assert_eq!(deck.len(), 3);
        assert_eq!(deck.count_of(&"OGN_001".into()), 2);
        assert_eq!(deck.count_of(&"OGN_003".into()), 0);
        assert!(deck.contains(&"OGN_002".into()));
    }

    #[test]
    fn test_deck_id_parse_display() {
        let id = DeckId::new_v4();
        let parsed: DeckId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<DeckId>().is_err());
    }

    #[test]
    fn test_serialization_shape() {
        let deck = Deck::new(DeckId::new_v4(), "Shape", vec![CardId::new("OGN_001")], now())
            .with_description("testing");

        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(json["card_ids"][0], "OGN_001");
        assert_eq!(json["description"], "testing");

        let back: Deck = serde_json::from_value(json).unwrap();
        assert_eq!(back, deck);
    }
}
