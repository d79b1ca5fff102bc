//! Declarative effect fields carried by card templates.
//!
//! These are plain data. Interpretation lives in `effects::resolver`.

use serde::{Deserialize, Serialize};

use super::definition::CardId;

/// Hand-composition gate checked during validation.
///
/// The card being played never counts towards its own requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRequirement {
    pub card: CardId,
    pub min_count: u32,
}

/// Seed / flaming interactions, resolved first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeedEffect {
    /// Add seeds, then an independent flaming-trigger roll.
    Accumulate { seeds: u32, flaming_chance: f64 },
    /// Consume all seeds into an impression gain of `rate_per_seed × seeds`.
    ///
    /// With `gamble = Some(p)`, a flaming-trigger roll happens first; if it
    /// fires, the seeds stay put and nothing converts.
    ConvertToImpressions { rate_per_seed: f64, gamble: Option<f64> },
    /// Consume all seeds into a mental heal.
    ConvertToMental { heal_per_seed: i32 },
}

/// Follower gain variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FollowerGain {
    Flat(i64),
    /// `floor(followers × turn × rate)`
    TurnScaled { rate: f64 },
}

/// Impression gain variants. Both go through `ResourceLedger::add_impression`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ImpressionGain {
    /// `floor(followers × rate)`
    Rate(f64),
    /// `floor(followers × rate × turn / 10)`
    TurnScaled { rate: f64 },
}

/// Where a generated card is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerateDestination {
    Hand,
    Discard,
    MiddleOfDraw,
    TopOfDraw,
}

/// A card created by playing another card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub card: CardId,
    pub destination: GenerateDestination,
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

impl GeneratedCard {
    /// One copy of `card` into `destination`.
    #[must_use]
    pub fn new(card: CardId, destination: GenerateDestination) -> Self {
        Self { card, destination, count: 1 }
    }

    #[must_use]
    pub fn times(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Which pile(s) a count rule inspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountSource {
    Hand,
    DrawPile,
    DiscardPile,
    /// `min(draw count, discard count)`
    DrawDiscardMin,
}

impl CountSource {
    /// Hand rules resolve before pile rules.
    #[must_use]
    pub fn is_hand(self) -> bool {
        matches!(self, CountSource::Hand)
    }
}

/// What a count rule does with the count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CountAction {
    /// Permanently remove every matching entry from the counted pile(s).
    ExhaustMatching,
    /// `add_impression(rate × count)`
    ImpressionsPerCard(f64),
    FollowersPerCard(i64),
    DrawPerCard(u32),
}

/// Effect scaled by how many copies of a template sit in a pile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountRule {
    pub source: CountSource,
    pub counted: CardId,
    /// Rule is skipped when the count is below this.
    #[serde(default)]
    pub min_count: u32,
    pub action: CountAction,
}

impl CountRule {
    #[must_use]
    pub fn new(source: CountSource, counted: CardId, action: CountAction) -> Self {
        Self { source, counted, min_count: 0, action }
    }

    #[must_use]
    pub fn at_least(mut self, min_count: u32) -> Self {
        self.min_count = min_count;
        self
    }
}

/// Outcome of a risk effect that fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskOutcome {
    MentalDamage(i32),
    LoseFollowers(i64),
    /// Set the account on fire and bump the flaming level.
    Ignite,
}

/// Single Bernoulli trial resolved near the end of a play.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskEffect {
    pub chance: f64,
    pub outcome: RiskOutcome,
}
