//! External acknowledgments (cut-in screens).

use serde::{Deserialize, Serialize};

/// Which screen the presentation should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcknowledgmentKind {
    /// Monster mode latched at a turn boundary; the bonus draft follows.
    MonsterCutIn,
    /// The turn's quota was missed and the penalty landed.
    QuotaFailed,
}

/// A screen the session waits on until `GameSession::acknowledge` is called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub kind: AcknowledgmentKind,
    pub title: String,
    pub message: String,
}

impl Acknowledgment {
    #[must_use]
    pub fn new(kind: AcknowledgmentKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, title: title.into(), message: message.into() }
    }

    /// Stock wording for a kind.
    #[must_use]
    pub fn preset(kind: AcknowledgmentKind) -> Self {
        match kind {
            AcknowledgmentKind::MonsterCutIn => {
                Self::new(kind, "MONSTER MODE", "Something snapped. Pick a card to unleash.")
            }
            AcknowledgmentKind::QuotaFailed => {
                Self::new(kind, "Quota missed", "The numbers weren't there this turn.")
            }
        }
    }

    /// Quota failure with the damage spelled out.
    #[must_use]
    pub fn quota_failed(gained: i64, quota: i64, damage: i32) -> Self {
        Self::new(
            AcknowledgmentKind::QuotaFailed,
            "Quota missed",
            format!("{} / {} impressions. Mental -{}.", gained, quota, damage),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_failed_message() {
        let ack = Acknowledgment::quota_failed(40, 100, 5);
        assert_eq!(ack.kind, AcknowledgmentKind::QuotaFailed);
        assert_eq!(ack.message, "40 / 100 impressions. Mental -5.");
    }
}
