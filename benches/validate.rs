//! Validation throughput for full-size decks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_deckbuilder::cards::{CardDefinition, CardId, CardRegistry, CardType};
use rust_deckbuilder::decks::{DeckService, InMemoryDeckStore};
use rust_deckbuilder::rules::{DeckValidator, ValidationOptions};

fn registry() -> CardRegistry {
    CardRegistry::from_definitions((1..=300).map(|n| {
        let card_type = if n % 50 == 0 { CardType::Legend } else { CardType::Unit };
        CardDefinition::new(format!("OGN_{n:03}"), format!("Card {n}"), card_type)
    }))
    .expect("bench catalog is valid")
}

fn full_deck() -> Vec<CardId> {
    let mut deck: Vec<CardId> = (0..39).map(|i| CardId::new(format!("OGN_{:03}", i % 13 + 1))).collect();
    deck.push(CardId::new("OGN_050"));
    deck
}

fn bench_validate(c: &mut Criterion) {
    let catalog = registry();
    let deck = full_deck();
    let validator = DeckValidator::default();

    c.bench_function("validate_40_full_report", |b| {
        b.iter(|| validator.validate(black_box(&deck), &catalog))
    });

    c.bench_function("validate_40_first_failure", |b| {
        b.iter(|| {
            validator.validate_with(black_box(&deck), &catalog, ValidationOptions::first_failure())
        })
    });
}

fn bench_add_remove(c: &mut Criterion) {
    let service = DeckService::new(registry(), InMemoryDeckStore::new());
    let mut deck = full_deck();
    deck.pop();
    let deck_id = service.create("Bench", deck).unwrap();
    let card = CardId::new("OGN_200");

    c.bench_function("add_then_remove", |b| {
        b.iter(|| {
            service.add_card(deck_id, &card).unwrap();
            service.remove_card(deck_id, &card).unwrap()
        })
    });
}

criterion_group!(benches, bench_validate, bench_add_remove);
criterion_main!(benches);
