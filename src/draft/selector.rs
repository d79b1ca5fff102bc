//! Tier-weighted draft offers with session-scoped exclusion.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::table::DraftProbabilityTable;
use crate::cards::{CardCatalog, CardId, Rarity};
use crate::core::GameRng;
use crate::zones::DeckEngine;

/// Offered templates. Drafts rarely exceed a handful of slots.
pub type DraftOptions = SmallVec<[CardId; 4]>;

/// Which kind of draft is on offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftKind {
    /// Tier-weighted offer after a successful turn; goes to the top of the
    /// draw pile.
    Regular,
    /// One-shot bonus when monster mode latches; goes to hand, middle of
    /// draw and discard.
    Monster,
}

/// Order in which tiers are tried once `rolled` comes up empty: downward
/// first, then upward.
#[must_use]
pub const fn fallback_order(rolled: Rarity) -> [Rarity; 3] {
    match rolled {
        Rarity::Epic => [Rarity::Epic, Rarity::Rare, Rarity::Common],
        Rarity::Rare => [Rarity::Rare, Rarity::Common, Rarity::Epic],
        Rarity::Common => [Rarity::Common, Rarity::Rare, Rarity::Epic],
    }
}

/// Generates draft offers and remembers what was picked this session.
#[derive(Clone, Debug, Default)]
pub struct DraftSelector {
    history: FxHashSet<CardId>,
}

impl DraftSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a template was already picked this session.
    #[must_use]
    pub fn is_excluded(&self, card: CardId) -> bool {
        self.history.contains(&card)
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Build up to `slot_count` distinct options from `pool`.
    ///
    /// Templates picked earlier this session are left out; if that leaves
    /// nothing, the history is forgotten and the full pool is used. Each slot
    /// rolls a tier from the table row for `score` and falls back through
    /// [`fallback_order`]. Fewer options than slots come back only when the
    /// pool runs dry.
    pub fn generate_draft_options(
        &mut self,
        pool: &[CardId],
        catalog: &CardCatalog,
        table: &DraftProbabilityTable,
        score: i64,
        slot_count: usize,
        rng: &mut GameRng,
    ) -> DraftOptions {
        let mut remaining: Vec<CardId> =
            pool.iter().copied().filter(|c| !self.is_excluded(*c)).collect();
        if remaining.is_empty() && !pool.is_empty() {
            tracing::debug!(cleared = self.history.len(), "draft pool exhausted, clearing history");
            self.history.clear();
            remaining = pool.to_vec();
        }

        let row = table.lookup(score);
        let mut options = DraftOptions::new();

        for _ in 0..slot_count {
            if remaining.is_empty() {
                break;
            }

            let rolled = rng
                .choose_weighted(&row.weights())
                .map_or(Rarity::Common, |i| Rarity::ALL[i]);

            let picked = fallback_order(rolled).into_iter().find_map(|tier| {
                let candidates: Vec<CardId> = remaining
                    .iter()
                    .copied()
                    .filter(|&c| catalog.rarity(c) == tier)
                    .collect();
                rng.choose(&candidates).copied()
            });

            if let Some(card) = picked {
                remaining.retain(|&c| c != card);
                options.push(card);
            }
        }

        tracing::debug!(score, row = ?row, offered = options.len(), "draft generated");
        options
    }

    /// Every template of the pool, unfiltered, in pool order.
    #[must_use]
    pub fn generate_monster_draft_options(&self, pool: &[CardId]) -> DraftOptions {
        pool.iter().copied().collect()
    }

    /// Put the chosen template on top of the draw pile and exclude it from
    /// later drafts this session.
    pub fn select_card(&mut self, card: CardId, deck: &mut DeckEngine) {
        deck.add_card_to_top_of_draw(card);
        self.history.insert(card);
    }
}
