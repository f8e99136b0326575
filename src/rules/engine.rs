//! Deck rule engine.
//!
//! `DeckValidator` decides whether a multiset of card identifiers forms a
//! legal deck. It is pure: no I/O beyond the catalog lookups it is handed,
//! no state between calls.
//!
//! ## Check Order
//!
//! 1. Size: more than `max_cards` identifiers
//! 2. Copies: an identifier appearing more than `max_copies` times
//! 3. Legends: more than `max_legends` Legend copies (unresolved cards skipped)
//! 4. Catalog: identifiers the catalog does not know
//!
//! Multiple offenders within one check are reported by first occurrence of
//! the identifier in the input. The outcome set does not depend on order;
//! the order only fixes which violation a single-message caller sees.

use rustc_hash::FxHashMap;

use crate::cards::{CardCatalog, CardId, CardType};
use crate::core::config::{DeckRequirements, DeckRules};

use super::completeness::CompletenessReport;
use super::violation::{ValidationResult, Violation};

/// How much of the report to produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Run every check, report every violation.
    #[default]
    FullReport,
    /// Stop at the first violation.
    FirstFailure,
}

/// Options for a single validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationOptions {
    pub mode: ReportMode,
    /// Report identifiers missing from the catalog.
    pub check_catalog: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::commit()
    }
}

impl ValidationOptions {
    /// Full report with the catalog check. Used before any write.
    #[must_use]
    pub const fn commit() -> Self {
        Self {
            mode: ReportMode::FullReport,
            check_catalog: true,
        }
    }

    /// Full report without the catalog check, for speculative previews.
    #[must_use]
    pub const fn preview() -> Self {
        Self {
            mode: ReportMode::FullReport,
            check_catalog: false,
        }
    }

    /// Stop at the first violation, catalog check included.
    #[must_use]
    pub const fn first_failure() -> Self {
        Self {
            mode: ReportMode::FirstFailure,
            check_catalog: true,
        }
    }

    #[must_use]
    pub const fn with_catalog_check(mut self, check: bool) -> Self {
        self.check_catalog = check;
        self
    }
}

/// Per-identifier tally in input order.
struct Tally<'a> {
    total: usize,
    order: Vec<&'a CardId>,
    counts: FxHashMap<&'a CardId, usize>,
}

impl<'a> Tally<'a> {
    fn new<I>(card_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a CardId>,
    {
        let mut tally = Tally {
            total: 0,
            order: Vec::new(),
            counts: FxHashMap::default(),
        };
        for id in card_ids {
            tally.total += 1;
            let count = tally.counts.entry(id).or_insert(0);
            if *count == 0 {
                tally.order.push(id);
            }
            *count += 1;
        }
        tally
    }

    /// Distinct identifiers with their counts, by first occurrence.
    fn distinct(&self) -> impl Iterator<Item = (&'a CardId, usize)> + '_ {
        self.order.iter().map(|id| (*id, self.counts[id]))
    }
}

/// Deck legality checker.
///
/// ## Example
///
/// ```
/// use rust_deckbuilder::cards::{CardDefinition, CardId, CardRegistry, CardType};
/// use rust_deckbuilder::rules::{DeckValidator, Violation};
///
/// let mut catalog = CardRegistry::new();
/// catalog.register(CardDefinition::new("OGN_001", "Unit", CardType::Unit)).unwrap();
///
/// let validator = DeckValidator::default();
/// let deck: Vec<CardId> = vec!["OGN_001".into(); 4];
/// let result = validator.validate(&deck, &catalog);
///
/// assert!(!result.is_valid);
/// assert_eq!(
///     result.violations,
///     vec![Violation::TooManyCopies { card_id: "OGN_001".into(), count: 4, max: 3 }]
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeckValidator {
    rules: DeckRules,
    requirements: DeckRequirements,
}

impl DeckValidator {
    #[must_use]
    pub fn new(rules: DeckRules) -> Self {
        Self {
            rules,
            requirements: DeckRequirements::default(),
        }
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: DeckRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &DeckRules {
        &self.rules
    }

    #[must_use]
    pub fn requirements(&self) -> &DeckRequirements {
        &self.requirements
    }

    /// Report how far `card_ids` is from a finished deck. Independent of
    /// legality: an illegal list still gets a report.
    pub fn completeness<'a, I, C>(&self, card_ids: I, catalog: &C) -> CompletenessReport
    where
        I: IntoIterator<Item = &'a CardId>,
        C: CardCatalog + ?Sized,
    {
        CompletenessReport::evaluate(card_ids, catalog, &self.requirements)
    }

    /// Validate with the commit options: every check, every violation.
    pub fn validate<'a, I, C>(&self, card_ids: I, catalog: &C) -> ValidationResult
    where
        I: IntoIterator<Item = &'a CardId>,
        C: CardCatalog + ?Sized,
    {
        self.validate_with(card_ids, catalog, ValidationOptions::commit())
    }

    /// Validate with explicit options.
    pub fn validate_with<'a, I, C>(
        &self,
        card_ids: I,
        catalog: &C,
        options: ValidationOptions,
    ) -> ValidationResult
    where
        I: IntoIterator<Item = &'a CardId>,
        C: CardCatalog + ?Sized,
    {
        let tally = Tally::new(card_ids);
        let first_only = options.mode == ReportMode::FirstFailure;
        let mut violations = Vec::new();

        macro_rules! report {
            ($violation:expr) => {{
                violations.push($violation);
                if first_only {
                    return ValidationResult::from_violations(violations);
                }
            }};
        }

        if tally.total > self.rules.max_cards {
            report!(Violation::DeckTooLarge {
                actual: tally.total,
                max: self.rules.max_cards,
            });
        }

        for (id, count) in tally.distinct() {
            if count > self.rules.max_copies {
                report!(Violation::TooManyCopies {
                    card_id: id.clone(),
                    count,
                    max: self.rules.max_copies,
                });
            }
        }

        // One lookup per distinct identifier, shared by the last two checks.
        let resolved: Vec<(&CardId, usize, Option<CardType>)> = tally
            .distinct()
            .map(|(id, count)| (id, count, catalog.card_type(id)))
            .collect();

        let legends: usize = resolved
            .iter()
            .filter(|(_, _, card_type)| *card_type == Some(CardType::Legend))
            .map(|(_, count, _)| count)
            .sum();
        if legends > self.rules.max_legends {
            report!(Violation::TooManyLegends {
                count: legends,
                max: self.rules.max_legends,
            });
        }

        if options.check_catalog {
            for (id, _, card_type) in &resolved {
                if card_type.is_none() {
                    report!(Violation::UnknownCard {
                        card_id: (*id).clone(),
                    });
                }
            }
        }

        ValidationResult::from_violations(violations)
    }
}
