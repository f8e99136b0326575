//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a printed card.
//! The deck rules only consult `card_type`; the remaining fields are
//! descriptive and exist so the catalog can serve a full card record.
//!
//! ## Identifier Format
//!
//! Card identifiers look like `OGN_001`, `OGN_007a` or `OGS_299S`:
//! a 2-3 letter set code, an underscore, a 3 digit collector number and
//! an optional variant suffix (`a` = alternate art, `S` = signature).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Highest printed cost.
pub const MAX_COST: u8 = 7;

/// Most colors a single card can carry.
pub const MAX_COLORS: usize = 2;

/// Identifier of a printed card (e.g. `OGN_001`).
///
/// Any string can be held here: deck candidate lists are validated
/// against the catalog, and a malformed identifier is just an unknown card.
/// Use `CardId::parse` when the format itself must be enforced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Wrap an identifier without checking its format.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an identifier, rejecting anything that is not `SET_NNN[a|S]`.
    pub fn parse(id: &str) -> Result<Self, CardIdError> {
        CardCode::parse(id)?;
        Ok(Self(id.to_string()))
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decompose into set code, collector number and variant.
    ///
    /// Returns `None` for malformed identifiers.
    #[must_use]
    pub fn code(&self) -> Option<CardCode> {
        CardCode::parse(&self.0).ok()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Error for identifiers that do not follow `SET_NNN[a|S]`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CardIdError {
    /// Set code is not 2-3 uppercase ASCII letters.
    #[error("invalid set code in card id {0:?}")]
    SetCode(String),
    /// Missing underscore or collector number is not 3 digits.
    #[error("invalid collector number in card id {0:?}")]
    CollectorNumber(String),
    /// Trailing characters other than a single `a` or `S`.
    #[error("invalid variant suffix in card id {0:?}")]
    Variant(String),
}

/// Printing variant, taken from the identifier suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// No suffix.
    Regular,
    /// `a` suffix.
    AltArt,
    /// `S` suffix.
    Signature,
}

/// Decomposed card identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardCode {
    pub set_code: String,
    pub collector_number: u16,
    pub variant: Variant,
}

impl CardCode {
    fn parse(id: &str) -> Result<Self, CardIdError> {
        let (set_code, rest) = id
            .split_once('_')
            .ok_or_else(|| CardIdError::CollectorNumber(id.to_string()))?;

        if !(2..=3).contains(&set_code.len()) || !set_code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(CardIdError::SetCode(id.to_string()));
        }

        let digits = rest.get(..3).filter(|d| d.bytes().all(|b| b.is_ascii_digit()));
        let Some(digits) = digits else {
            return Err(CardIdError::CollectorNumber(id.to_string()));
        };

        let variant = match &rest[3..] {
            "" => Variant::Regular,
            "a" => Variant::AltArt,
            "S" => Variant::Signature,
            _ => return Err(CardIdError::Variant(id.to_string())),
        };

        Ok(Self {
            set_code: set_code.to_string(),
            // Three ASCII digits always fit.
            collector_number: digits.parse().unwrap_or_default(),
            variant,
        })
    }
}

/// Card type. Only `Legend` has rules significance for deck building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Spell,
    Unit,
    #[serde(rename = "Champion Unit")]
    ChampionUnit,
    #[serde(rename = "Signature Unit")]
    SignatureUnit,
    #[serde(rename = "Signature Spell")]
    SignatureSpell,
    Legend,
    Battlefield,
    Gear,
    Rune,
    Token,
}

impl CardType {
    /// All card types in catalog order.
    pub const ALL: [CardType; 10] = [
        CardType::Spell,
        CardType::Unit,
        CardType::ChampionUnit,
        CardType::SignatureUnit,
        CardType::SignatureSpell,
        CardType::Legend,
        CardType::Battlefield,
        CardType::Gear,
        CardType::Rune,
        CardType::Token,
    ];

    /// Display name as printed on the card.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Spell => "Spell",
            CardType::Unit => "Unit",
            CardType::ChampionUnit => "Champion Unit",
            CardType::SignatureUnit => "Signature Unit",
            CardType::SignatureSpell => "Signature Spell",
            CardType::Legend => "Legend",
            CardType::Battlefield => "Battlefield",
            CardType::Gear => "Gear",
            CardType::Rune => "Rune",
            CardType::Token => "Token",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardType {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| CardError::UnknownType(s.to_string()))
    }
}

/// Card color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Fury,
    Body,
    Mind,
    Calm,
    Chaos,
    Order,
    Colorless,
}

/// Error for card definitions that break catalog invariants.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CardError {
    #[error(transparent)]
    Id(#[from] CardIdError),
    #[error("card {card_id} costs {cost}; maximum is {}", MAX_COST)]
    CostOutOfRange { card_id: CardId, cost: u8 },
    #[error("card {card_id} has {count} colors; maximum is {}", MAX_COLORS)]
    TooManyColors { card_id: CardId, count: usize },
    #[error("card {card_id} is a {card_type} and cannot be multicolored")]
    MulticolorNonLegend { card_id: CardId, card_type: CardType },
    #[error("unknown card type {0:?}")]
    UnknownType(String),
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use rust_deckbuilder::cards::{CardDefinition, CardType, Color};
///
/// let jinx = CardDefinition::new("OGN_202", "Jinx", CardType::Legend)
///     .with_colors([Color::Fury, Color::Chaos])
///     .with_cost(0);
///
/// assert!(jinx.check().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this printing.
    #[serde(rename = "card_id")]
    pub id: CardId,

    /// Card name.
    pub name: String,

    pub card_type: CardType,

    /// 0-2 colors; order carries no meaning.
    #[serde(rename = "color")]
    pub colors: SmallVec<[Color; 2]>,

    pub cost: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,

    /// Rules text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CardDefinition {
    /// Create a colorless, zero-cost card definition.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_type,
            colors: SmallVec::new(),
            cost: 0,
            rarity: None,
            text: None,
        }
    }

    /// Set the colors (builder pattern).
    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u8) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn is_legend(&self) -> bool {
        self.card_type == CardType::Legend
    }

    /// Check the catalog invariants for this card.
    ///
    /// - identifier follows `SET_NNN[a|S]`
    /// - cost is within `0..=MAX_COST`
    /// - at most `MAX_COLORS` colors, and more than one only on a Legend
    pub fn check(&self) -> Result<(), CardError> {
        CardId::parse(self.id.as_str())?;

        if self.cost > MAX_COST {
            return Err(CardError::CostOutOfRange {
                card_id: self.id.clone(),
                cost: self.cost,
            });
        }

        let count = self.colors.len();
        if count > MAX_COLORS {
            return Err(CardError::TooManyColors {
                card_id: self.id.clone(),
                count,
            });
        }
        if count > 1 && !self.is_legend() {
            return Err(CardError::MulticolorNonLegend {
                card_id: self.id.clone(),
                card_type: self.card_type,
            });
        }

        Ok(())
    }
}
