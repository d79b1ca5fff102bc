//! Read-only snapshots for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::draft::{DraftKind, DraftOptions};
use crate::resources::ResourceState;
use crate::rules::{Acknowledgment, Phase, TurnModifiers};

/// A draft waiting for the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOffer {
    pub kind: DraftKind,
    pub options: DraftOptions,
}

impl DraftOffer {
    /// Only regular drafts may be declined.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        self.kind == DraftKind::Regular
    }
}

/// The one thing the session is blocked on, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingInteraction {
    Acknowledgment(Acknowledgment),
    Draft(DraftOffer),
}

/// Everything a HUD needs to redraw itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub stage_id: Option<String>,
    pub phase: Phase,
    pub turn: u32,
    pub turn_limit: u32,
    pub resources: ResourceState,
    pub quota: i64,
    pub gained_this_turn: i64,
    pub modifiers: TurnModifiers,
    pub hand: Vec<CardId>,
    pub draw_count: usize,
    pub discard_count: usize,
    pub exhausted_count: usize,
    pub is_drawing: bool,
    pub pending: Option<PendingInteraction>,
}
