//! Deck rule engine.
//!
//! `DeckValidator` checks a candidate list of card identifiers against
//! `DeckRules` and reports every broken rule as a `Violation`.
//!
//! `CompletenessReport` is the separate, advisory question of whether a deck
//! is finished.
//!
//! The engine never writes anything. The deck service calls it before
//! every mutation it commits.

pub mod completeness;
pub mod engine;
pub mod violation;

pub use completeness::{CompletenessReport, Requirement, RequirementStatus};
pub use engine::{DeckValidator, ReportMode, ValidationOptions};
pub use violation::{ValidationResult, Violation};
