//! Card system: definitions, registry, and the catalog capability.
//!
//! ## Key Types
//!
//! - `CardId`: Printed card identifier (`OGN_001`, `OGN_007a`, `OGS_299S`)
//! - `CardType` / `Color`: Fixed card enumerations
//! - `CardDefinition`: Static card data
//! - `CardRegistry`: In-process catalog keyed by `CardId`
//! - `CardCatalog`: Lookup capability handed to the rule engine

pub mod catalog;
pub mod definition;
pub mod registry;

pub use catalog::CardCatalog;
pub use definition::{
    CardCode, CardDefinition, CardError, CardId, CardIdError, CardType, Color, Variant,
    MAX_COLORS, MAX_COST,
};
pub use registry::{CardRegistry, CatalogError};
