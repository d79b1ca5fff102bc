//! Content configuration.
//!
//! Content is authored outside the engine and loaded at startup:
//! - `GameSettings`: initial resources, thresholds, multipliers, turn limit
//! - `StageDefinition`: initial deck, draft pools, quota and probability tables
//! - `ContentBundle`: settings + card catalog + stages, as one JSON document
//!
//! Nothing in here is mutated during play. `ContentBundle::validate` catches
//! every dangling reference before a session can start.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::ContentError;
use crate::cards::{CardCatalog, CardId, CardTemplate};
use crate::draft::DraftProbabilityTable;

/// Global rules knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub initial_followers: i64,
    pub max_mental: i32,
    /// Starting mental; `None` starts at `max_mental`.
    pub initial_mental: Option<i32>,
    pub max_motivation: i32,

    /// Mental at or below which monster mode latches.
    pub monster_threshold: i32,
    /// Applied to every impression gain while in monster mode.
    pub monster_impression_multiplier: f64,
    /// Applied to the quota penalty while in monster mode.
    pub monster_penalty_multiplier: i32,

    /// Cards drawn at the start of every turn, before extra draws.
    pub hand_size: u32,
    pub turn_limit: u32,
    pub flaming_damage_per_level: i32,

    /// Penalty = ceil(turn / penalty_divisor) × penalty_step.
    pub penalty_divisor: u32,
    pub penalty_step: i32,

    pub draft_slot_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            initial_followers: 10,
            max_mental: 10,
            initial_mental: None,
            max_motivation: 3,
            monster_threshold: 3,
            monster_impression_multiplier: 2.0,
            monster_penalty_multiplier: 2,
            hand_size: 5,
            turn_limit: 10,
            flaming_damage_per_level: 1,
            penalty_divisor: 4,
            penalty_step: 5,
            draft_slot_count: 3,
        }
    }
}

impl GameSettings {
    #[must_use]
    pub fn with_followers(mut self, followers: i64) -> Self {
        self.initial_followers = followers;
        self
    }

    #[must_use]
    pub fn with_mental(mut self, max: i32, threshold: i32) -> Self {
        self.max_mental = max;
        self.monster_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_initial_mental(mut self, mental: i32) -> Self {
        self.initial_mental = Some(mental);
        self
    }

    #[must_use]
    pub fn with_max_motivation(mut self, max: i32) -> Self {
        self.max_motivation = max;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: u32) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }

    #[must_use]
    pub fn with_draft_slots(mut self, slots: usize) -> Self {
        self.draft_slot_count = slots;
        self
    }

    #[must_use]
    pub fn with_monster_multipliers(mut self, impressions: f64, penalty: i32) -> Self {
        self.monster_impression_multiplier = impressions;
        self.monster_penalty_multiplier = penalty;
        self
    }

    /// Starting mental, clamped into range.
    #[must_use]
    pub fn starting_mental(&self) -> i32 {
        self.initial_mental.unwrap_or(self.max_mental).clamp(0, self.max_mental)
    }

    /// Reject settings the rules cannot run with.
    pub fn validate(&self) -> Result<(), ContentError> {
        let fail = |msg: &str| Err(ContentError::InvalidSettings(msg.to_string()));
        if self.max_mental <= 0 {
            return fail("max_mental must be positive");
        }
        if self.monster_threshold >= self.max_mental {
            return fail("monster_threshold must be below max_mental");
        }
        if self.max_motivation < 0 {
            return fail("max_motivation must not be negative");
        }
        if self.initial_followers < 0 {
            return fail("initial_followers must not be negative");
        }
        if self.penalty_divisor == 0 {
            return fail("penalty_divisor must be positive");
        }
        if self.penalty_step < 0 {
            return fail("penalty_step must not be negative");
        }
        if self.monster_penalty_multiplier < 0 {
            return fail("monster_penalty_multiplier must not be negative");
        }
        if self.flaming_damage_per_level < 0 {
            return fail("flaming_damage_per_level must not be negative");
        }
        if self.monster_impression_multiplier < 0.0 {
            return fail("monster_impression_multiplier must not be negative");
        }
        Ok(())
    }
}

/// A playable stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDefinition {
    pub id: String,
    pub name: String,
    pub initial_deck: Vec<CardId>,
    pub draft_pool: Vec<CardId>,
    pub monster_pool: Vec<CardId>,
    /// Quota per turn, index 0 = turn 1.
    pub quota_table: Vec<i64>,
    pub probability_table: DraftProbabilityTable,
    /// Overrides `GameSettings::turn_limit`.
    pub turn_limit: Option<u32>,
}

impl StageDefinition {
    /// Create a stage with an initial deck and nothing else.
    #[must_use]
    pub fn new(id: impl Into<String>, initial_deck: Vec<CardId>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            initial_deck,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_draft_pool(mut self, pool: Vec<CardId>) -> Self {
        self.draft_pool = pool;
        self
    }

    #[must_use]
    pub fn with_monster_pool(mut self, pool: Vec<CardId>) -> Self {
        self.monster_pool = pool;
        self
    }

    #[must_use]
    pub fn with_quota_table(mut self, table: Vec<i64>) -> Self {
        self.quota_table = table;
        self
    }

    #[must_use]
    pub fn with_probability_table(mut self, table: DraftProbabilityTable) -> Self {
        self.probability_table = table;
        self
    }

    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = Some(limit);
        self
    }

    fn validate(&self, catalog: &CardCatalog) -> Result<(), ContentError> {
        if self.initial_deck.is_empty() {
            return Err(ContentError::EmptyDeck { stage: self.id.clone() });
        }
        let pools = [
            ("initial deck", &self.initial_deck),
            ("draft pool", &self.draft_pool),
            ("monster pool", &self.monster_pool),
        ];
        for (pool_name, pool) in pools {
            if let Some(&card) = pool.iter().find(|&&id| !catalog.contains(id)) {
                return Err(ContentError::UnknownCard {
                    card,
                    context: format!("{} of stage {:?}", pool_name, self.id),
                });
            }
        }
        if !self.probability_table.is_ascending() {
            return Err(ContentError::UnsortedProbabilityTable { stage: self.id.clone() });
        }
        Ok(())
    }
}

/// Everything authored outside the engine, as loaded from JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBundle {
    pub settings: GameSettings,
    pub cards: Vec<CardTemplate>,
    pub stages: Vec<StageDefinition>,
}

impl ContentBundle {
    /// Parse a bundle without validating it.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse and validate in one step.
    pub fn load(json: &str) -> Result<ValidatedContent, ContentError> {
        Self::from_json(json)?.validate()
    }

    /// Check settings, catalog cross-references and every stage.
    pub fn validate(self) -> Result<ValidatedContent, ContentError> {
        self.settings.validate()?;

        let catalog = CardCatalog::from_templates(self.cards)?;
        catalog.validate()?;

        let mut stages = FxHashMap::default();
        for stage in self.stages {
            stage.validate(&catalog)?;
            if stages.contains_key(&stage.id) {
                return Err(ContentError::DuplicateStage(stage.id));
            }
            stages.insert(stage.id.clone(), stage);
        }

        Ok(ValidatedContent {
            inner: Arc::new(ContentInner {
                settings: self.settings,
                catalog,
                stages,
            }),
        })
    }
}

#[derive(Debug)]
struct ContentInner {
    settings: GameSettings,
    catalog: CardCatalog,
    stages: FxHashMap<String, StageDefinition>,
}

/// Content that passed validation. Cheap to clone; shared read-only between
/// sessions.
#[derive(Clone, Debug)]
pub struct ValidatedContent {
    inner: Arc<ContentInner>,
}

impl ValidatedContent {
    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.inner.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn stage(&self, id: &str) -> Option<&StageDefinition> {
        self.inner.stages.get(id)
    }

    /// Stage ids, sorted.
    #[must_use]
    pub fn stage_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.inner.stages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
