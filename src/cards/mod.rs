//! Card system: templates, effect fields, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card templates; piles hold these
//! - `CardTemplate`: Immutable authored card data
//! - `Rarity`, `PlayCondition`: Draft tier and playability gate
//! - `CardCatalog`: Template lookup and content validation

pub mod definition;
pub mod effect;
pub mod registry;

pub use definition::{CardId, CardTemplate, PlayCondition, Rarity};
pub use effect::{
    CountAction, CountRule, CountSource, FollowerGain, GenerateDestination, GeneratedCard,
    HandRequirement, ImpressionGain, RiskEffect, RiskOutcome, SeedEffect,
};
pub use registry::CardCatalog;
