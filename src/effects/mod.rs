//! Card effect resolution.
//!
//! Card templates carry their effects as plain data (see `cards::effect`).
//! `EffectResolver` interprets that data against the ledger, the deck and
//! the turn state through a borrowed `PlayContext`.

mod resolver;

pub use resolver::{EffectResolver, PlayContext, PlayFollowup, PlayGate, PlayOutcome};
