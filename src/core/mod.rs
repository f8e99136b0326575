//! Core types: rule configuration, service configuration, and time.

pub mod clock;
pub mod config;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfigError, DeckRequirements, DeckRules, ServiceConfig, BATTLEFIELDS, LEGENDS,
    MAIN_DECK_CARDS, MAX_COPIES, MAX_DECK_CARDS, MAX_LEGENDS, RUNES,
};
