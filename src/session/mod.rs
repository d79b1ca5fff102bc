//! Session: the explicit context object that owns one playthrough.
//!
//! ## Key Types
//!
//! - `GameSession`: Owns ledger, deck, drafts, quota, monster mode and phases
//! - `Command`: Queued external input, processed strictly in order
//! - `PendingInteraction`: The acknowledgment or draft the session waits on
//! - `SessionView`: Read-only snapshot for presentation

mod command;
mod game;
mod view;

pub use command::{Command, CommandOutcome};
pub use game::GameSession;
pub use view::{DraftOffer, PendingInteraction, SessionView};
