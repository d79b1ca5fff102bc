//! Events emitted to the presentation layer.
//!
//! Every state mutation the presentation cares about produces exactly one
//! event carrying the new value(s). The engine never calls back into the
//! presentation; it only appends here.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::draft::DraftKind;
use crate::rules::{Acknowledgment, Phase};

/// Something that happened in the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Resources ===
    FollowersChanged { followers: i64 },
    MentalChanged { mental: i32, max: i32 },
    MotivationChanged { motivation: i32, max: i32 },
    ImpressionsChanged { impressions: i64 },
    FlamingChanged { seeds: u32, level: u32, on_fire: bool },

    // === Turn flow ===
    TurnStarted { turn: u32 },
    TurnChanged { turn: u32 },
    TurnEnded { turn: u32 },
    PhaseChanged { phase: Phase },

    // === Deck ===
    DeckChanged { draw: usize, hand: usize, discard: usize },
    Reshuffled { moved: usize },
    CardPlayed { card: CardId },
    CardExhausted { card: CardId },
    /// Post-play timeline event, emitted when a play finished without
    /// opening a draft.
    CardResolved { card: CardId },

    // === Quota ===
    QuotaSet { turn: u32, quota: i64 },
    QuotaEvaluated { gained: i64, quota: i64, met: bool, penalty: i32, flaming_damage: i32 },

    // === Monster mode / drafts ===
    MonsterModeTriggered { mental: i32 },
    DraftOffered { kind: DraftKind, options: Vec<CardId> },
    DraftResolved { kind: DraftKind, card: Option<CardId> },

    /// The presentation must show this and call `GameSession::acknowledge`.
    ShowAcknowledgment { ack: Acknowledgment },

    // === Terminal ===
    GameOver { turn: u32, impressions: i64 },
    StageResult { stage: String, impressions: i64, cleared: bool },
}

impl GameEvent {
    /// Whether this event asks the presentation for input.
    #[must_use]
    pub fn awaits_input(&self) -> bool {
        matches!(self, GameEvent::ShowAcknowledgment { .. } | GameEvent::DraftOffered { .. })
    }
}
