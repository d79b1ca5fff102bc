//! Turn rules.
//!
//! - `TurnPhaseController`: the turn loop state machine
//! - `QuotaEvaluator`: per-turn impression target and penalty
//! - `MonsterModeController`: the one-shot monster mode aftermath
//! - `Acknowledgment`: screens the session waits on

pub mod ack;
pub mod monster;
pub mod phase;
pub mod quota;

pub use ack::{Acknowledgment, AcknowledgmentKind};
pub use monster::MonsterModeController;
pub use phase::{Phase, TurnAdvance, TurnModifiers, TurnPhaseController};
pub use quota::{QuotaEvaluator, QuotaOutcome, QuotaState};
