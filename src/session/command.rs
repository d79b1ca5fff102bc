//! Queued player input.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayRejection;
use crate::effects::PlayOutcome;

/// One external input to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartStage(String),
    PlayCard(CardId),
    EndPlayerAction,
    Acknowledge,
    /// Index into the pending draft's options.
    SelectDraftOption(usize),
    SkipDraft,
    BeginDrawAnimation,
    CompleteDrawAnimation,
    Reset,
}

/// What a command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Played(PlayOutcome),
    /// Not valid in the current state; nothing changed.
    Ignored,
    Rejected(PlayRejection),
    Failed(String),
}

impl CommandOutcome {
    pub(crate) fn from_flag(applied: bool) -> Self {
        if applied {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Ignored
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied | CommandOutcome::Played(_))
    }
}
