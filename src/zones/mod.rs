//! Card piles.
//!
//! ## Key Types
//!
//! - `Pile`: Draw, Hand or Discard
//! - `DeckEngine`: Pile ownership, drawing, reshuffling, insertion, counting
//! - `DrawReport`: What a draw actually did

pub mod deck;

pub use deck::{DeckEngine, DrawReport, Pile};
