//! # influence-deck
//!
//! Rules engine for a turn-based influencer deckbuilder.
//!
//! The player runs an account through a fixed number of turns, spending
//! motivation to play cards that grow followers and earn impressions. Every
//! turn has an impression quota; missing it costs mental. When mental first
//! dips to the monster threshold the account goes into monster mode for the
//! rest of the stage.
//!
//! ## Design Principles
//!
//! 1. **Explicit session**: All state lives in a `GameSession`. No globals,
//!    so several sessions can run side by side (tests do).
//!
//! 2. **Events out, commands in**: The engine never calls the presentation.
//!    It appends `GameEvent`s to a queue and waits on `PendingInteraction`s
//!    that the presentation resolves with explicit calls.
//!
//! 3. **Content is data**: Cards, stages and settings are authored as JSON
//!    and validated once, before play.
//!
//! 4. **Deterministic**: Every roll goes through a seeded `GameRng`.
//!
//! ## Modules
//!
//! - `core`: RNG, content configuration, errors, progress persistence
//! - `cards`: Card templates, effect fields, the catalog
//! - `events`: Outbound event queue
//! - `resources`: Followers, mental, motivation, impressions, flaming
//! - `zones`: Draw pile, hand, discard pile
//! - `draft`: Probability tables and draft offers
//! - `rules`: Turn phases, quota, monster mode, acknowledgments
//! - `effects`: Card play validation and resolution
//! - `session`: The session object tying it all together

pub mod core;
pub mod cards;
pub mod events;
pub mod resources;
pub mod zones;
pub mod draft;
pub mod rules;
pub mod effects;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ContentBundle, ContentError, GameRng, GameRngState, GameSettings, MemoryStore,
    PlayRejection, ProgressSnapshot, ProgressStore, StageDefinition, StoreError,
    ValidatedContent,
};

pub use crate::cards::{CardCatalog, CardId, CardTemplate, PlayCondition, Rarity};

pub use crate::events::{EventQueue, GameEvent};

pub use crate::resources::{ResourceLedger, ResourceState};

pub use crate::zones::{DeckEngine, Pile};

pub use crate::draft::{DraftKind, DraftProbabilityTable, DraftSelector, ProbabilityRow};

pub use crate::rules::{
    Acknowledgment, AcknowledgmentKind, MonsterModeController, Phase, QuotaEvaluator,
    TurnPhaseController,
};

pub use crate::effects::{EffectResolver, PlayFollowup, PlayOutcome};

pub use crate::session::{Command, CommandOutcome, GameSession, PendingInteraction, SessionView};
