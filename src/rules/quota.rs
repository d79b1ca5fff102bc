//! Per-turn impression quota and the mental penalty for missing it.

use serde::{Deserialize, Serialize};

use crate::core::GameSettings;
use crate::events::{EventQueue, GameEvent};
use crate::resources::{MentalOutcome, ResourceLedger};

/// Baseline captured at the start of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub turn_start_impressions: i64,
    pub turn_start_followers: i64,
    pub turn_start_mental: i32,
    pub current_turn_quota: i64,
}

/// End-of-turn verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuotaOutcome {
    pub gained: i64,
    pub quota: i64,
    pub met: bool,
    pub penalty: i32,
    pub flaming_damage: i32,
    /// Result of the single combined mental hit.
    pub mental: MentalOutcome,
}

impl QuotaOutcome {
    #[must_use]
    pub fn total_damage(&self) -> i32 {
        self.penalty.saturating_add(self.flaming_damage)
    }
}

/// Computes quotas and penalties.
#[derive(Clone, Debug, Default)]
pub struct QuotaEvaluator {
    table: Vec<i64>,
    penalty_divisor: u32,
    penalty_step: i32,
    monster_multiplier: i32,
    flaming_damage_per_level: i32,
    state: QuotaState,
}

impl QuotaEvaluator {
    #[must_use]
    pub fn new(table: Vec<i64>, settings: &GameSettings) -> Self {
        Self {
            table,
            penalty_divisor: settings.penalty_divisor.max(1),
            penalty_step: settings.penalty_step,
            monster_multiplier: settings.monster_penalty_multiplier,
            flaming_damage_per_level: settings.flaming_damage_per_level,
            state: QuotaState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuotaState {
        &self.state
    }

    /// Quota for a turn (1-based).
    ///
    /// Turns past the end of the table reuse its last entry; an empty table
    /// means `turn × 100`.
    #[must_use]
    pub fn quota_for_turn(&self, turn: u32) -> i64 {
        let index = turn.saturating_sub(1) as usize;
        match self.table.get(index).or_else(|| self.table.last()) {
            Some(&quota) => quota,
            None => i64::from(turn) * 100,
        }
    }

    /// `ceil(turn / divisor) × step`, times the monster multiplier while in
    /// monster mode.
    #[must_use]
    pub fn penalty_for_turn(&self, turn: u32, monster_mode: bool) -> i32 {
        let bands = turn.div_ceil(self.penalty_divisor) as i32;
        let base = bands.saturating_mul(self.penalty_step);
        if monster_mode {
            base.saturating_mul(self.monster_multiplier)
        } else {
            base
        }
    }

    /// Capture the turn baseline and fix this turn's quota.
    pub fn begin_turn(&mut self, turn: u32, ledger: &ResourceLedger, events: &mut EventQueue) -> i64 {
        let quota = self.quota_for_turn(turn);
        self.state = QuotaState {
            turn_start_impressions: ledger.impressions(),
            turn_start_followers: ledger.followers(),
            turn_start_mental: ledger.mental(),
            current_turn_quota: quota,
        };
        events.push(GameEvent::QuotaSet { turn, quota });
        quota
    }

    /// Impressions gained since `begin_turn`.
    #[must_use]
    pub fn gained(&self, ledger: &ResourceLedger) -> i64 {
        ledger.impressions() - self.state.turn_start_impressions
    }

    /// Compare the turn against its quota, consume the flaming level and
    /// apply penalty plus flaming damage as one mental hit.
    pub fn evaluate_end_of_turn(
        &mut self,
        turn: u32,
        ledger: &mut ResourceLedger,
        events: &mut EventQueue,
    ) -> QuotaOutcome {
        let gained = self.gained(ledger);
        let quota = self.state.current_turn_quota;
        let met = gained >= quota;
        let penalty = if met { 0 } else { self.penalty_for_turn(turn, ledger.is_monster_mode()) };

        let level = ledger.consume_flaming_level(events);
        let flaming_damage = (level as i32).saturating_mul(self.flaming_damage_per_level);

        events.push(GameEvent::QuotaEvaluated { gained, quota, met, penalty, flaming_damage });
        tracing::debug!(turn, gained, quota, met, penalty, flaming_damage, "quota evaluated");

        let mental = ledger.damage_mental(penalty.saturating_add(flaming_damage), events);
        QuotaOutcome { gained, quota, met, penalty, flaming_damage, mental }
    }
}
