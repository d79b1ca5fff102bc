//! Monster mode: the one-shot switch when mental first dips below the
//! threshold.
//!
//! The latch itself lives in the ledger (it happens inside `damage_mental`).
//! This controller handles the aftermath: the half-heal and the single bonus
//! draft that must resolve before play continues.

use crate::cards::CardId;
use crate::events::EventQueue;
use crate::resources::ResourceLedger;
use crate::zones::DeckEngine;

#[derive(Clone, Debug, Default)]
pub struct MonsterModeController {
    activated: bool,
    draft_done: bool,
    /// Set by `activate`, cleared by whoever consumes it.
    pending_activation: bool,
}

impl MonsterModeController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether the bonus draft is still owed.
    #[must_use]
    pub fn needs_draft(&self) -> bool {
        self.activated && !self.draft_done
    }

    /// React to the latch: heal by `ceil(mental / 2)`. Returns the amount healed.
    /// Later calls do nothing.
    pub fn activate(&mut self, ledger: &mut ResourceLedger, events: &mut EventQueue) -> i32 {
        if self.activated {
            return 0;
        }
        self.activated = true;
        self.pending_activation = true;

        let heal = (ledger.mental().max(0) + 1) / 2;
        let healed = ledger.heal_mental(heal, events);
        tracing::info!(healed, mental = ledger.mental(), "monster mode activated");
        healed
    }

    /// Whether `activate` ran since the last call.
    pub fn take_activation(&mut self) -> bool {
        std::mem::take(&mut self.pending_activation)
    }

    /// Add the chosen card to hand, middle of draw and discard.
    pub fn complete_draft(&mut self, card: CardId, deck: &mut DeckEngine) {
        deck.add_card_to_hand(card);
        deck.add_card_to_middle_of_draw(card);
        deck.add_card_to_discard(card);
        self.draft_done = true;
    }

    /// Mark the draft as settled without a card (empty monster pool).
    pub fn forgo_draft(&mut self) {
        self.draft_done = true;
    }
}
