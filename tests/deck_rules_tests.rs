//! Rule engine integration tests.
//!
//! These tests pin the deck construction boundaries:
//! - Size limit (40 cards)
//! - Copy limit (3 per identifier)
//! - Legend limit (1, counted by copies)
//! - Catalog consistency

use rust_deckbuilder::cards::{CardDefinition, CardId, CardRegistry, CardType, Color};
use rust_deckbuilder::rules::{DeckValidator, ValidationOptions, Violation};

fn catalog() -> CardRegistry {
    let mut registry = CardRegistry::new();
    for n in 1..=20 {
        registry
            .register(CardDefinition::new(format!("OGN_{n:03}"), format!("Unit {n}"), CardType::Unit))
            .unwrap();
    }
    registry
        .register(
            CardDefinition::new("OGN_250", "Jinx", CardType::Legend)
                .with_colors([Color::Fury, Color::Chaos]),
        )
        .unwrap();
    registry
        .register(CardDefinition::new("OGN_251", "Ahri", CardType::Legend))
        .unwrap();
    registry
        .register(CardDefinition::new("OGS_299S", "Signature", CardType::SignatureUnit))
        .unwrap();
    registry
}

/// `count` cards cycling through units so no identifier exceeds 3 copies.
fn units(count: usize) -> Vec<CardId> {
    (0..count)
        .map(|i| CardId::new(format!("OGN_{:03}", i % 20 + 1)))
        .collect()
}

fn copies(id: &str, n: usize) -> Vec<CardId> {
    vec![CardId::new(id); n]
}

// =============================================================================
// Size
// =============================================================================

#[test]
fn test_forty_cards_is_valid() {
    let deck = units(40);
    let result = DeckValidator::default().validate(&deck, &catalog());
    assert!(result.is_valid, "{result}");
}

#[test]
fn test_forty_one_cards_is_too_large() {
    let deck = units(41);
    let result = DeckValidator::default().validate(&deck, &catalog());

    assert!(!result.is_valid);
    assert_eq!(
        result.violations,
        vec![Violation::DeckTooLarge { actual: 41, max: 40 }]
    );
}

#[test]
fn test_empty_deck_is_valid() {
    let deck: Vec<CardId> = Vec::new();
    assert!(DeckValidator::default().validate(&deck, &catalog()).is_valid);
}

// =============================================================================
// Copies
// =============================================================================

#[test]
fn test_three_copies_is_valid() {
    let deck = copies("OGN_001", 3);
    assert!(DeckValidator::default().validate(&deck, &catalog()).is_valid);
}

#[test]
fn test_four_copies_is_too_many() {
    let deck = copies("OGN_001", 4);
    let result = DeckValidator::default().validate(&deck, &catalog());

    assert_eq!(
        result.violations,
        vec![Violation::TooManyCopies {
            card_id: "OGN_001".into(),
            count: 4,
            max: 3,
        }]
    );
}

#[test]
fn test_variants_count_as_distinct_identifiers() {
    let mut registry = catalog();
    registry
        .register(CardDefinition::new("OGN_001a", "Unit 1 (Alt Art)", CardType::Unit))
        .unwrap();

    let mut deck = copies("OGN_001", 3);
    deck.extend(copies("OGN_001a", 3));
    assert!(DeckValidator::default().validate(&deck, &registry).is_valid);
}

// =============================================================================
// Legends
// =============================================================================

#[test]
fn test_single_legend_is_valid() {
    let mut deck = units(10);
    deck.push("OGN_250".into());
    assert!(DeckValidator::default().validate(&deck, &catalog()).is_valid);
}

#[test]
fn test_second_copy_of_same_legend() {
    let deck = copies("OGN_250", 2);
    let result = DeckValidator::default().validate(&deck, &catalog());
    assert_eq!(
        result.violations,
        vec![Violation::TooManyLegends { count: 2, max: 1 }]
    );
}

#[test]
fn test_two_different_legends() {
    let deck: Vec<CardId> = vec!["OGN_250".into(), "OGN_005".into(), "OGN_251".into()];
    let result = DeckValidator::default().validate(&deck, &catalog());
    assert_eq!(
        result.violations,
        vec![Violation::TooManyLegends { count: 2, max: 1 }]
    );
}

#[test]
fn test_signature_unit_is_not_a_legend() {
    let deck: Vec<CardId> = vec!["OGN_250".into(), "OGS_299S".into()];
    assert!(DeckValidator::default().validate(&deck, &catalog()).is_valid);
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn test_unknown_card_counts_toward_size_and_copies() {
    let mut deck = units(40);
    deck.extend(copies("OGN_999", 4));

    let result = DeckValidator::default().validate(&deck, &catalog());
    assert_eq!(
        result.violations,
        vec![
            Violation::DeckTooLarge { actual: 44, max: 40 },
            Violation::TooManyCopies {
                card_id: "OGN_999".into(),
                count: 4,
                max: 3,
            },
            Violation::UnknownCard { card_id: "OGN_999".into() },
        ]
    );
}

#[test]
fn test_malformed_identifier_is_unknown() {
    let deck: Vec<CardId> = vec!["not a card".into()];
    let result = DeckValidator::default().validate(&deck, &catalog());
    assert_eq!(
        result.violations,
        vec![Violation::UnknownCard { card_id: "not a card".into() }]
    );
}

#[test]
fn test_preview_ignores_unknown_cards() {
    let deck = copies("OGN_999", 3);
    let result =
        DeckValidator::default().validate_with(&deck, &catalog(), ValidationOptions::preview());
    assert!(result.is_valid);
}

// =============================================================================
// Report
// =============================================================================

#[test]
fn test_first_failure_matches_head_of_full_report() {
    let mut deck = units(40);
    deck.extend(copies("OGN_250", 2));
    deck.push("OGN_777".into());

    let validator = DeckValidator::default();
    let full = validator.validate(&deck, &catalog());
    let first = validator.validate_with(&deck, &catalog(), ValidationOptions::first_failure());

    assert_eq!(full.violations.len(), 3);
    assert_eq!(first.violations, vec![full.violations[0].clone()]);
    assert_eq!(first.first_message(), full.first_message());
}

#[test]
fn test_outcome_independent_of_input_order() {
    let mut deck = units(38);
    deck.extend(copies("OGN_250", 2));
    deck.extend(copies("OGN_404", 1));

    let mut reversed = deck.clone();
    reversed.reverse();

    let validator = DeckValidator::default();
    let mut a = validator.validate(&deck, &catalog()).violations;
    let mut b = validator.validate(&reversed, &catalog()).violations;
    let key = |v: &Violation| format!("{v:?}");
    a.sort_by_key(key);
    b.sort_by_key(key);
    assert_eq!(a, b);
}

#[test]
fn test_report_json() {
    let deck = copies("OGN_001", 4);
    let json = DeckValidator::default()
        .validate(&deck, &catalog())
        .to_json()
        .unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "is_valid": false,
            "violations": [
                {"kind": "too_many_copies", "card_id": "OGN_001", "count": 4, "max": 3}
            ]
        })
    );
}
