//! Deck rule and service configuration.
//!
//! - `DeckRules`: Construction limits checked by the rule engine
//! - `DeckRequirements`: Card counts a finished deck needs before play
//! - `ServiceConfig`: Rules plus the commit retry policy of the deck service
//!
//! Both deserialize with per-field defaults, so a host config only needs
//! to name what it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most cards a deck may hold.
pub const MAX_DECK_CARDS: usize = 40;

/// Most copies of a single card identifier per deck.
pub const MAX_COPIES: usize = 3;

/// Most Legend cards per deck, counted by physical copies.
pub const MAX_LEGENDS: usize = 1;

/// Main deck cards a finished deck holds.
pub const MAIN_DECK_CARDS: usize = 40;

/// Distinct Battlefields a finished deck holds.
pub const BATTLEFIELDS: usize = 3;

/// Legends a finished deck holds.
pub const LEGENDS: usize = 1;

/// Runes a finished deck holds. Copies of one Rune all count.
pub const RUNES: usize = 12;

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deck construction limits.
///
/// ```
/// use rust_deckbuilder::core::DeckRules;
///
/// let rules = DeckRules::default();
/// assert_eq!(rules.max_cards, 40);
/// assert_eq!(rules.max_copies, 3);
/// assert_eq!(rules.max_legends, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckRules {
    pub max_cards: usize,
    pub max_copies: usize,
    pub max_legends: usize,
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            max_cards: MAX_DECK_CARDS,
            max_copies: MAX_COPIES,
            max_legends: MAX_LEGENDS,
        }
    }
}

impl DeckRules {
    #[must_use]
    pub fn with_max_cards(mut self, max: usize) -> Self {
        self.max_cards = max;
        self
    }

    #[must_use]
    pub fn with_max_copies(mut self, max: usize) -> Self {
        self.max_copies = max;
        self
    }

    #[must_use]
    pub fn with_max_legends(mut self, max: usize) -> Self {
        self.max_legends = max;
        self
    }
}

/// Card counts a finished deck must hit exactly.
///
/// Unlike `DeckRules` these are never enforced on writes. A deck under
/// construction is expected to miss them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckRequirements {
    pub main_deck: usize,
    pub battlefields: usize,
    pub legends: usize,
    pub runes: usize,
}

impl Default for DeckRequirements {
    fn default() -> Self {
        Self {
            main_deck: MAIN_DECK_CARDS,
            battlefields: BATTLEFIELDS,
            legends: LEGENDS,
            runes: RUNES,
        }
    }
}

impl DeckRequirements {
    #[must_use]
    pub fn with_main_deck(mut self, count: usize) -> Self {
        self.main_deck = count;
        self
    }

    #[must_use]
    pub fn with_battlefields(mut self, count: usize) -> Self {
        self.battlefields = count;
        self
    }

    #[must_use]
    pub fn with_legends(mut self, count: usize) -> Self {
        self.legends = count;
        self
    }

    #[must_use]
    pub fn with_runes(mut self, count: usize) -> Self {
        self.runes = count;
        self
    }
}

/// Deck service configuration.
///
/// `max_commit_attempts` bounds how often a mutation re-reads and
/// re-validates a deck after losing a conditional write to a concurrent
/// mutation. Between attempts the service sleeps a uniformly random
/// duration in `0..=retry_backoff`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub rules: DeckRules,

    pub requirements: DeckRequirements,

    pub max_commit_attempts: u32,

    #[serde(rename = "retry_backoff_ms", with = "millis")]
    pub retry_backoff: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rules: DeckRules::default(),
            requirements: DeckRequirements::default(),
            max_commit_attempts: 8,
            retry_backoff: Duration::from_millis(1),
        }
    }
}

impl ServiceConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    ///
    /// ```
    /// use rust_deckbuilder::core::ServiceConfig;
    ///
    /// let config = ServiceConfig::from_json(r#"{"max_commit_attempts": 3}"#).unwrap();
    /// assert_eq!(config.max_commit_attempts, 3);
    /// assert_eq!(config.rules.max_cards, 40);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_rules(mut self, rules: DeckRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: DeckRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Set the attempt bound. Zero is treated as one attempt.
    #[must_use]
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Effective attempt bound, at least one.
    #[must_use]
    pub fn commit_attempts(&self) -> u32 {
        self.max_commit_attempts.max(1)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
