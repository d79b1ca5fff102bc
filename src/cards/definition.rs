//! Card templates - immutable, externally authored card data.
//!
//! A `CardTemplate` is the "type" of a card (e.g. "Viral Post"). Piles hold
//! `CardId`s only, so three copies of a card are three entries of the same id
//! and all comparisons are by id.

use serde::{Deserialize, Serialize};

use super::effect::{
    CountRule, FollowerGain, GeneratedCard, HandRequirement, ImpressionGain, RiskEffect, SeedEffect,
};

/// Unique identifier for a card template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Draft tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
}

impl Rarity {
    /// All tiers, lowest first.
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Epic];

    /// Position in [`Rarity::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Epic => 2,
        }
    }
}

/// When a card may be played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayCondition {
    #[default]
    Always,
    /// Dead card; sits in hand and only feeds counting effects.
    Never,
    MonsterModeOnly,
    NormalModeOnly,
}

impl PlayCondition {
    /// Whether the condition admits a play given the current mode.
    #[must_use]
    pub fn allows(self, monster_mode: bool) -> bool {
        match self {
            PlayCondition::Always => true,
            PlayCondition::Never => false,
            PlayCondition::MonsterModeOnly => monster_mode,
            PlayCondition::NormalModeOnly => !monster_mode,
        }
    }
}

/// Static card template.
///
/// Every effect field is gated by being non-zero / present; the resolver runs
/// them in a fixed order (see `effects::resolver`).
///
/// ## Example
///
/// ```
/// use influence_deck::cards::{CardTemplate, CardId, ImpressionGain};
///
/// let post = CardTemplate::new(CardId::new(1), "Post")
///     .with_motivation_cost(1)
///     .with_impressions(ImpressionGain::Rate(1.5));
///
/// assert_eq!(post.motivation_cost, 1);
/// assert!(!post.exhaust);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTemplate {
    pub id: CardId,
    pub name: String,
    pub rarity: Rarity,
    pub play_condition: PlayCondition,
    /// Removed from circulation after play instead of discarded.
    pub exhaust: bool,

    pub motivation_cost: i32,
    pub hand_requirement: Option<HandRequirement>,

    // === Execution fields, in resolution order ===
    pub seeds: Option<SeedEffect>,
    pub mental_cost: i32,
    pub mental_heal: i32,
    pub followers: Option<FollowerGain>,
    pub impressions: Option<ImpressionGain>,
    pub draw: u32,
    pub motivation_gain: i32,
    pub extra_draws_per_turn: u32,
    pub max_motivation_bonus: i32,
    pub generates: Vec<GeneratedCard>,
    pub count_rules: Vec<CountRule>,
    pub risk: Option<RiskEffect>,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::new(CardId::new(0), "")
    }
}

impl CardTemplate {
    /// Create a template with no effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rarity: Rarity::Common,
            play_condition: PlayCondition::Always,
            exhaust: false,
            motivation_cost: 0,
            hand_requirement: None,
            seeds: None,
            mental_cost: 0,
            mental_heal: 0,
            followers: None,
            impressions: None,
            draw: 0,
            motivation_gain: 0,
            extra_draws_per_turn: 0,
            max_motivation_bonus: 0,
            generates: Vec::new(),
            count_rules: Vec::new(),
            risk: None,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_play_condition(mut self, condition: PlayCondition) -> Self {
        self.play_condition = condition;
        self
    }

    #[must_use]
    pub fn exhausting(mut self) -> Self {
        self.exhaust = true;
        self
    }

    #[must_use]
    pub fn with_motivation_cost(mut self, cost: i32) -> Self {
        self.motivation_cost = cost;
        self
    }

    /// Require `min_count` other copies of `card` in hand.
    #[must_use]
    pub fn requiring_in_hand(mut self, card: CardId, min_count: u32) -> Self {
        self.hand_requirement = Some(HandRequirement { card, min_count });
        self
    }

    #[must_use]
    pub fn with_seeds(mut self, seeds: SeedEffect) -> Self {
        self.seeds = Some(seeds);
        self
    }

    #[must_use]
    pub fn with_mental_cost(mut self, cost: i32) -> Self {
        self.mental_cost = cost;
        self
    }

    #[must_use]
    pub fn with_mental_heal(mut self, heal: i32) -> Self {
        self.mental_heal = heal;
        self
    }

    #[must_use]
    pub fn with_followers(mut self, gain: FollowerGain) -> Self {
        self.followers = Some(gain);
        self
    }

    #[must_use]
    pub fn with_impressions(mut self, gain: ImpressionGain) -> Self {
        self.impressions = Some(gain);
        self
    }

    #[must_use]
    pub fn with_draw(mut self, count: u32) -> Self {
        self.draw = count;
        self
    }

    #[must_use]
    pub fn with_motivation_gain(mut self, gain: i32) -> Self {
        self.motivation_gain = gain;
        self
    }

    #[must_use]
    pub fn with_extra_draws_per_turn(mut self, extra: u32) -> Self {
        self.extra_draws_per_turn = extra;
        self
    }

    #[must_use]
    pub fn with_max_motivation_bonus(mut self, bonus: i32) -> Self {
        self.max_motivation_bonus = bonus;
        self
    }

    #[must_use]
    pub fn generating(mut self, generated: GeneratedCard) -> Self {
        self.generates.push(generated);
        self
    }

    #[must_use]
    pub fn with_count_rule(mut self, rule: CountRule) -> Self {
        self.count_rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_risk(mut self, risk: RiskEffect) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Every template id this card refers to (generated cards, count rules,
    /// hand requirement). Used by content validation.
    pub fn referenced_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.hand_requirement
            .iter()
            .map(|req| req.card)
            .chain(self.generates.iter().map(|g| g.card))
            .chain(self.count_rules.iter().map(|r| r.counted))
    }

    /// Every probability this card carries, for range validation.
    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        let seed_p = match &self.seeds {
            Some(SeedEffect::Accumulate { flaming_chance, .. }) => Some(*flaming_chance),
            Some(SeedEffect::ConvertToImpressions { gamble, .. }) => *gamble,
            _ => None,
        };
        seed_p.into_iter().chain(self.risk.iter().map(|r| r.chance))
    }
}
