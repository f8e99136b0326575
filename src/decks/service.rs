//! Deck mutation service.
//!
//! `DeckService` sequences catalog reads, rule evaluation and store writes
//! so a stored deck is never illegal, not even transiently:
//!
//! - `create` validates the full initial list before the first write
//! - `add_card` validates `current ++ [card]` and commits it conditionally
//! - `remove_card` drops every copy of a card; any subset of a legal deck
//!   is legal, so removal needs no validation
//!
//! ## Concurrency
//!
//! Each mutation reads the deck, computes and validates the candidate, then
//! writes with `conditional_update_*` keyed on the version it read. A lost
//! race re-runs the whole read-validate-write step against fresh state, up
//! to `ServiceConfig::max_commit_attempts` times. Mutations on different
//! decks never touch the same record and never contend.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use im::Vector;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::cards::{CardCatalog, CardId};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::ServiceConfig;
use crate::error::{DeckError, DeckResult};
use crate::rules::{CompletenessReport, DeckValidator, ValidationOptions, ValidationResult};

use super::deck::{Deck, DeckId};
use super::store::{CommitOutcome, DeckStore};

/// Request to create a deck.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewDeck {
    pub name: String,
    pub description: Option<String>,
    pub card_ids: Vec<CardId>,
}

impl NewDeck {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_cards(mut self, card_ids: impl IntoIterator<Item = CardId>) -> Self {
        self.card_ids = card_ids.into_iter().collect();
        self
    }
}

/// Outcome of one read-validate-write attempt.
enum Attempt<T> {
    Done(T),
    Conflict,
}

/// Deck mutation service over a card catalog and a deck store.
///
/// ## Example
///
/// ```
/// use rust_deckbuilder::cards::{CardDefinition, CardId, CardRegistry, CardType};
/// use rust_deckbuilder::decks::{DeckService, InMemoryDeckStore};
///
/// let mut catalog = CardRegistry::new();
/// catalog.register(CardDefinition::new("OGN_001", "Unit", CardType::Unit)).unwrap();
///
/// let service = DeckService::new(catalog, InMemoryDeckStore::new());
/// let deck_id = service.create("Starter", vec![CardId::new("OGN_001")]).unwrap();
///
/// service.add_card(deck_id, &"OGN_001".into()).unwrap();
/// assert_eq!(service.get_deck(deck_id).unwrap().len(), 2);
///
/// assert_eq!(service.remove_card(deck_id, &"OGN_001".into()).unwrap(), 2);
/// ```
pub struct DeckService<C, S> {
    catalog: C,
    store: S,
    clock: Arc<dyn Clock>,
    validator: DeckValidator,
    config: ServiceConfig,
}

impl<C, S> std::fmt::Debug for DeckService<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C: CardCatalog, S: DeckStore> DeckService<C, S> {
    /// Create a service with default rules and the wall clock.
    pub fn new(catalog: C, store: S) -> Self {
        let config = ServiceConfig::default();
        Self {
            catalog,
            store,
            clock: Arc::new(SystemClock),
            validator: DeckValidator::new(config.rules).with_requirements(config.requirements),
            config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.validator = DeckValidator::new(config.rules).with_requirements(config.requirements);
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validate a candidate list with every check, catalog included.
    pub fn validate_cards<'a, I>(&self, card_ids: I) -> ValidationResult
    where
        I: IntoIterator<Item = &'a CardId>,
    {
        self.validator.validate(card_ids, &self.catalog)
    }

    /// Validate a candidate list without the catalog check.
    pub fn preview_cards<'a, I>(&self, card_ids: I) -> ValidationResult
    where
        I: IntoIterator<Item = &'a CardId>,
    {
        self.validator
            .validate_with(card_ids, &self.catalog, ValidationOptions::preview())
    }

    /// Create a deck with a name and starting cards.
    pub fn create(
        &self,
        name: impl Into<String>,
        card_ids: impl IntoIterator<Item = CardId>,
    ) -> DeckResult<DeckId> {
        self.create_deck(NewDeck::new(name).with_cards(card_ids))
    }

    /// Create a deck. Nothing is written unless the starting cards are legal.
    #[instrument(skip_all, fields(deck_name = %request.name, cards = request.card_ids.len()))]
    pub fn create_deck(&self, request: NewDeck) -> DeckResult<DeckId> {
        let now = self.clock.now();
        let name = checked_name(&request.name)?;

        let result = self.validator.validate(&request.card_ids, &self.catalog);
        if !result.is_valid {
            debug!(violations = result.violations.len(), "rejected new deck");
            return Err(DeckError::ValidationFailed(result));
        }

        let mut deck = Deck::new(DeckId::new_v4(), name, request.card_ids, now);
        deck.description = request.description;
        let deck_id = deck.id;
        self.store.insert(deck)?;

        info!(deck = %deck_id, "created deck");
        Ok(deck_id)
    }

    /// Append one copy of a card.
    ///
    /// Behaves as if the whole deck plus the new card were re-validated and
    /// committed, atomically with respect to other mutations of this deck.
    #[instrument(skip_all, fields(deck = %deck_id, card = %card_id))]
    pub fn add_card(&self, deck_id: DeckId, card_id: &CardId) -> DeckResult<()> {
        self.with_retries(deck_id, || {
            let deck = self.load(deck_id)?;
            if !self.catalog.contains(card_id) {
                return Err(DeckError::CardNotFound(card_id.clone()));
            }

            let mut candidate = deck.card_ids.clone();
            candidate.push_back(card_id.clone());

            // Existing cards passed the catalog check when they were committed
            // and the new card was just resolved.
            let result = self.validator.validate_with(
                &candidate,
                &self.catalog,
                ValidationOptions::preview(),
            );
            if !result.is_valid {
                debug!(violations = result.violations.len(), "rejected card");
                return Err(DeckError::ValidationFailed(result));
            }

            self.commit_cards(&deck, candidate)
        })?;

        info!("added card");
        Ok(())
    }

    /// Remove every copy of a card. Returns how many were removed.
    ///
    /// Removing a card the deck does not hold succeeds with 0 and writes
    /// nothing, so `updated_at` is left alone.
    #[instrument(skip_all, fields(deck = %deck_id, card = %card_id))]
    pub fn remove_card(&self, deck_id: DeckId, card_id: &CardId) -> DeckResult<usize> {
        let removed = self.with_retries(deck_id, || {
            let deck = self.load(deck_id)?;
            let removed = deck.count_of(card_id);
            if removed == 0 {
                return Ok(Attempt::Done(0));
            }

            let remaining: Vector<CardId> = deck
                .card_ids
                .iter()
                .filter(|id| *id != card_id)
                .cloned()
                .collect();

            Ok(match self.commit_cards(&deck, remaining)? {
                Attempt::Done(()) => Attempt::Done(removed),
                Attempt::Conflict => Attempt::Conflict,
            })
        })?;

        if removed > 0 {
            info!(removed, "removed card");
        }
        Ok(removed)
    }

    /// Re-validate a stored deck.
    ///
    /// Stored decks are legal when written. A failing report here means the
    /// catalog changed underneath the deck.
    #[instrument(skip_all, fields(deck = %deck_id))]
    pub fn check(&self, deck_id: DeckId) -> DeckResult<ValidationResult> {
        let deck = self.load(deck_id)?;
        let result = self.validator.validate(&deck.card_ids, &self.catalog);
        if !result.is_valid {
            warn!(violations = result.violations.len(), "stored deck no longer valid");
        }
        Ok(result)
    }

    /// How far a stored deck is from finished. Read-only and advisory.
    #[instrument(skip_all, fields(deck = %deck_id))]
    pub fn completeness(&self, deck_id: DeckId) -> DeckResult<CompletenessReport> {
        let deck = self.load(deck_id)?;
        Ok(self.validator.completeness(&deck.card_ids, &self.catalog))
    }

    /// Change a deck's name and description.
    #[instrument(skip_all, fields(deck = %deck_id))]
    pub fn rename(
        &self,
        deck_id: DeckId,
        name: &str,
        description: Option<String>,
    ) -> DeckResult<()> {
        let name = checked_name(name)?;

        self.with_retries(deck_id, || {
            let deck = self.load(deck_id)?;
            let outcome = self.store.conditional_update_details(
                deck_id,
                deck.version,
                name.to_string(),
                description.clone(),
                self.stamp(&deck),
            )?;
            settle(deck_id, outcome)
        })?;

        info!(deck_name = name, "renamed deck");
        Ok(())
    }

    pub fn get_deck(&self, deck_id: DeckId) -> DeckResult<Deck> {
        self.load(deck_id)
    }

    /// All decks, most recently updated first.
    pub fn list_decks(&self) -> DeckResult<Vec<Deck>> {
        Ok(self.store.list()?)
    }

    #[instrument(skip_all, fields(deck = %deck_id))]
    pub fn delete_deck(&self, deck_id: DeckId) -> DeckResult<()> {
        if !self.store.delete(deck_id)? {
            return Err(DeckError::DeckNotFound(deck_id));
        }
        info!("deleted deck");
        Ok(())
    }

    fn load(&self, deck_id: DeckId) -> DeckResult<Deck> {
        self.store
            .get(deck_id)?
            .ok_or(DeckError::DeckNotFound(deck_id))
    }

    /// Write time for a mutation of `deck`, read per attempt. Never earlier
    /// than the `updated_at` the attempt read, so `updated_at` only moves
    /// forward even when a retry follows a writer with a later clock.
    fn stamp(&self, deck: &Deck) -> DateTime<Utc> {
        self.clock.now().max(deck.updated_at)
    }

    fn commit_cards(&self, deck: &Deck, card_ids: Vector<CardId>) -> DeckResult<Attempt<()>> {
        let outcome = self.store.conditional_update_card_ids(
            deck.id,
            deck.version,
            card_ids,
            self.stamp(deck),
        )?;
        settle(deck.id, outcome)
    }

    /// Run one read-validate-write step until it stops losing the
    /// conditional write, or the attempt bound runs out.
    fn with_retries<T, F>(&self, deck_id: DeckId, mut step: F) -> DeckResult<T>
    where
        F: FnMut() -> DeckResult<Attempt<T>>,
    {
        let attempts = self.config.commit_attempts();
        for attempt in 1..=attempts {
            match step()? {
                Attempt::Done(value) => return Ok(value),
                Attempt::Conflict if attempt < attempts => {
                    warn!(attempt, "conditional write lost, retrying");
                    self.backoff();
                }
                Attempt::Conflict => {}
            }
        }

        warn!(attempts, "giving up after repeated write conflicts");
        Err(DeckError::ConcurrentModification { deck_id, attempts })
    }

    fn backoff(&self) {
        let pause = jitter(self.config.retry_backoff, &mut rand::thread_rng());
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }
}

/// Uniform pause in `0..=max`. Bounds past `u64::MAX` nanoseconds saturate.
fn jitter<R: Rng + ?Sized>(max: Duration, rng: &mut R) -> Duration {
    let bound = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if bound == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rng.gen_range(0..=bound))
}

fn checked_name(name: &str) -> DeckResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeckError::InvalidName);
    }
    Ok(name)
}

fn settle(deck_id: DeckId, outcome: CommitOutcome) -> DeckResult<Attempt<()>> {
    match outcome {
        CommitOutcome::Committed(_) => Ok(Attempt::Done(())),
        CommitOutcome::Conflict => Ok(Attempt::Conflict),
        CommitOutcome::Missing => Err(DeckError::DeckNotFound(deck_id)),
    }
}
