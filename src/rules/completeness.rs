//! Deck completeness.
//!
//! Legality says what a deck may never hold. Completeness says whether a
//! deck is finished: exact counts of main deck cards, Battlefields, Legends
//! and Runes, as listed in `DeckRequirements`. A deck under construction is
//! legal and incomplete at the same time, so completeness is reported and
//! never enforced on writes.
//!
//! Cards are sorted into slots by catalog type:
//!
//! - Battlefield: counted once per distinct identifier
//! - Legend, Rune: counted by copies
//! - Anything else: a main deck card
//!
//! Identifiers the catalog cannot resolve fill no slot and are reported as
//! `unresolved`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId, CardType};
use crate::core::config::DeckRequirements;

/// A slot a finished deck must fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    MainDeck,
    Battlefields,
    Legend,
    Runes,
}

impl Requirement {
    pub const ALL: [Requirement; 4] = [
        Requirement::MainDeck,
        Requirement::Battlefields,
        Requirement::Legend,
        Requirement::Runes,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Requirement::MainDeck => "Main deck cards",
            Requirement::Battlefields => "Battlefield cards",
            Requirement::Legend => "Legend card",
            Requirement::Runes => "Rune cards",
        }
    }

    /// Slot a resolved card fills.
    #[must_use]
    pub const fn for_type(card_type: CardType) -> Self {
        match card_type {
            CardType::Battlefield => Requirement::Battlefields,
            CardType::Legend => Requirement::Legend,
            CardType::Rune => Requirement::Runes,
            _ => Requirement::MainDeck,
        }
    }

    const fn required(self, requirements: &DeckRequirements) -> usize {
        match self {
            Requirement::MainDeck => requirements.main_deck,
            Requirement::Battlefields => requirements.battlefields,
            Requirement::Legend => requirements.legends,
            Requirement::Runes => requirements.runes,
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress on one requirement. `met` iff `current == required`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub requirement: Requirement,
    pub required: usize,
    pub current: usize,
    pub met: bool,
}

impl RequirementStatus {
    #[must_use]
    pub fn new(requirement: Requirement, required: usize, current: usize) -> Self {
        Self {
            requirement,
            required,
            current,
            met: current == required,
        }
    }

    /// Cards still needed.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.current)
    }

    /// Cards past the required count.
    #[must_use]
    pub fn excess(&self) -> usize {
        self.current.saturating_sub(self.required)
    }
}

impl std::fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} / {}", self.requirement, self.current, self.required)?;
        if self.missing() > 0 {
            write!(f, " (need {} more)", self.missing())?;
        } else if self.excess() > 0 {
            write!(f, " ({} too many)", self.excess())?;
        }
        Ok(())
    }
}

/// Completeness of a card list, one status per `Requirement` in
/// `Requirement::ALL` order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Every requirement met and every card resolved.
    pub is_complete: bool,
    pub requirements: Vec<RequirementStatus>,
    pub unresolved: usize,
}

impl CompletenessReport {
    /// Tally `card_ids` against `requirements`.
    pub fn evaluate<'a, I, C>(card_ids: I, catalog: &C, requirements: &DeckRequirements) -> Self
    where
        I: IntoIterator<Item = &'a CardId>,
        C: CardCatalog + ?Sized,
    {
        let mut main_deck = 0;
        let mut legends = 0;
        let mut runes = 0;
        let mut unresolved = 0;
        let mut battlefields: FxHashSet<&CardId> = FxHashSet::default();

        for id in card_ids {
            let Some(card_type) = catalog.card_type(id) else {
                unresolved += 1;
                continue;
            };
            match Requirement::for_type(card_type) {
                Requirement::MainDeck => main_deck += 1,
                Requirement::Battlefields => {
                    battlefields.insert(id);
                }
                Requirement::Legend => legends += 1,
                Requirement::Runes => runes += 1,
            }
        }

        let statuses: Vec<RequirementStatus> = Requirement::ALL
            .into_iter()
            .map(|requirement| {
                let current = match requirement {
                    Requirement::MainDeck => main_deck,
                    Requirement::Battlefields => battlefields.len(),
                    Requirement::Legend => legends,
                    Requirement::Runes => runes,
                };
                RequirementStatus::new(requirement, requirement.required(requirements), current)
            })
            .collect();

        Self {
            is_complete: unresolved == 0 && statuses.iter().all(|status| status.met),
            requirements: statuses,
            unresolved,
        }
    }

    #[must_use]
    pub fn status(&self, requirement: Requirement) -> Option<&RequirementStatus> {
        self.requirements
            .iter()
            .find(|status| status.requirement == requirement)
    }

    /// Requirements not yet met.
    pub fn unmet(&self) -> impl Iterator<Item = &RequirementStatus> {
        self.requirements.iter().filter(|status| !status.met)
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl std::fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_complete {
            return f.write_str("Deck requirements met");
        }
        f.write_str("Deck requirements not met:")?;
        for status in &self.requirements {
            write!(f, "\n- {status}")?;
        }
        if self.unresolved > 0 {
            write!(f, "\n- {} cards not in the catalog", self.unresolved)?;
        }
        Ok(())
    }
}
