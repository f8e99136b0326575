//! Rule violations and validation reports.
//!
//! A `ValidationResult` carries every violation found, in check order.
//! Single-message callers show `first_message()`; the detailed report
//! renders one violation per line.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// A single broken deck construction rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// More cards than the deck size limit.
    DeckTooLarge { actual: usize, max: usize },
    /// More copies of one identifier than the copy limit.
    TooManyCopies { card_id: CardId, count: usize, max: usize },
    /// More Legend cards than allowed, counted by copies.
    TooManyLegends { count: usize, max: usize },
    /// Identifier not present in the card catalog.
    UnknownCard { card_id: CardId },
}

impl Violation {
    /// Human readable description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Violation::DeckTooLarge { actual, max } => {
                format!("Deck has {actual} cards; maximum is {max}")
            }
            Violation::TooManyCopies { card_id, count, max } => {
                format!("Deck has {count} copies of {card_id}; maximum is {max}")
            }
            Violation::TooManyLegends { count, max } => {
                format!("Deck has {count} Legend cards; maximum is {max}")
            }
            Violation::UnknownCard { card_id } => {
                format!("Card {card_id} is not in the catalog")
            }
        }
    }

    /// Stable snake_case name of the violation kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Violation::DeckTooLarge { .. } => "deck_too_large",
            Violation::TooManyCopies { .. } => "too_many_copies",
            Violation::TooManyLegends { .. } => "too_many_legends",
            Violation::UnknownCard { .. } => "unknown_card",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of validating a candidate deck.
///
/// `is_valid` is true iff `violations` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// A result with no violations.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// First violation, the one single-message callers report.
    #[must_use]
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    #[must_use]
    pub fn first_message(&self) -> Option<String> {
        self.first().map(Violation::message)
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }

    /// Check whether any violation of the given kind is present.
    #[must_use]
    pub fn has(&self, kind: &str) -> bool {
        self.violations.iter().any(|v| v.kind() == kind)
    }

    /// Serialize for the detailed validation report.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid {
            return f.write_str("Deck is valid");
        }
        writeln!(f, "Deck is invalid ({} violations):", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {violation}")?;
        }
        Ok(())
    }
}
