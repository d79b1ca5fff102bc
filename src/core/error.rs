//! Error types.
//!
//! Content problems are fatal and surface before gameplay begins. Player
//! actions that break a rule are rejected with a `PlayRejection` and leave the
//! session untouched. Resource underflow is never an error; it clamps.

use thiserror::Error;

use crate::cards::{CardId, PlayCondition};
use crate::rules::Phase;

/// Fatal content-load error.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate card id {0}")]
    DuplicateCard(CardId),

    #[error("unknown card {card} ({context})")]
    UnknownCard { card: CardId, context: String },

    #[error("duplicate stage id {0:?}")]
    DuplicateStage(String),

    #[error("unknown stage {0:?}")]
    UnknownStage(String),

    #[error("stage {stage:?} has an empty initial deck")]
    EmptyDeck { stage: String },

    #[error("probability table rows must ascend by min_impressions ({stage:?})")]
    UnsortedProbabilityTable { stage: String },

    #[error("probability {value} outside [0, 1] ({context})")]
    InvalidProbability { value: f64, context: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Why `try_play_card` refused a card. Variants follow validation order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlayRejection {
    #[error("no active session")]
    SessionInactive,

    #[error("draw animation in progress")]
    Drawing,

    #[error("a draft is waiting for a choice")]
    AwaitingDraft,

    #[error("waiting for an acknowledgment")]
    AwaitingAcknowledgment,

    #[error("cards can only be played during PlayerAction (current: {0:?})")]
    WrongPhase(Phase),

    #[error("{0} is not in hand")]
    NotInHand(CardId),

    #[error("{card} cannot be played ({condition:?})")]
    Unplayable { card: CardId, condition: PlayCondition },

    #[error("needs {required} x {card} in hand, found {found}")]
    HandRequirement { card: CardId, required: u32, found: u32 },

    #[error("needs {required} motivation, have {available}")]
    InsufficientMotivation { required: i32, available: i32 },
}

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary: {0}")]
    Binary(#[from] bincode::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let err = PlayRejection::InsufficientMotivation { required: 2, available: 1 };
        assert_eq!(err.to_string(), "needs 2 motivation, have 1");

        let err = PlayRejection::WrongPhase(Phase::EndStep);
        assert!(err.to_string().contains("EndStep"));
    }

    #[test]
    fn test_content_error_from_json() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: ContentError = parse.unwrap_err().into();
        assert!(matches!(err, ContentError::Parse(_)));
    }
}
