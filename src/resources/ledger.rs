//! Resource ledger: followers, mental, motivation, impressions, flaming.
//!
//! All mutation goes through the methods here. Each mutator clamps to its
//! bounds and emits a change event with the new value(s).

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, GameSettings};
use crate::events::{EventQueue, GameEvent};

/// Raw resource values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub followers: i64,
    pub mental: i32,
    pub max_mental: i32,
    pub motivation: i32,
    pub max_motivation: i32,
    /// Never decreases within a session.
    pub impressions: i64,
    pub flaming_seeds: u32,
    pub flaming_level: u32,
    pub is_on_fire: bool,
    /// Latched true at most once per session.
    pub is_monster_mode: bool,
}

/// What a mental change did beyond moving the number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MentalOutcome {
    Unchanged,
    Changed,
    /// Crossed the monster threshold downward for the first time.
    MonsterTriggered,
    /// Reached 0; the session is over.
    Depleted,
}

/// Owns and guards `ResourceState`.
#[derive(Clone, Debug, Default)]
pub struct ResourceLedger {
    state: ResourceState,
    monster_threshold: i32,
    monster_impression_multiplier: f64,
}

impl ResourceLedger {
    /// Fresh ledger for a stage.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            state: ResourceState {
                followers: settings.initial_followers.max(0),
                mental: settings.starting_mental(),
                max_mental: settings.max_mental,
                motivation: settings.max_motivation,
                max_motivation: settings.max_motivation,
                ..ResourceState::default()
            },
            monster_threshold: settings.monster_threshold,
            monster_impression_multiplier: settings.monster_impression_multiplier,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    #[must_use]
    pub fn followers(&self) -> i64 {
        self.state.followers
    }

    #[must_use]
    pub fn mental(&self) -> i32 {
        self.state.mental
    }

    #[must_use]
    pub fn motivation(&self) -> i32 {
        self.state.motivation
    }

    #[must_use]
    pub fn impressions(&self) -> i64 {
        self.state.impressions
    }

    #[must_use]
    pub fn is_monster_mode(&self) -> bool {
        self.state.is_monster_mode
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.state.mental == 0
    }

    /// Announce every value, e.g. after a stage starts.
    pub fn emit_all(&self, events: &mut EventQueue) {
        self.emit_followers(events);
        self.emit_mental(events);
        self.emit_motivation(events);
        self.emit_impressions(events);
        self.emit_flaming(events);
    }

    // === Followers ===

    /// Add (or remove) followers, clamping at 0. Returns the applied delta.
    pub fn add_followers(&mut self, delta: i64, events: &mut EventQueue) -> i64 {
        let before = self.state.followers;
        self.state.followers = before.saturating_add(delta).max(0);
        self.emit_followers(events);
        self.state.followers - before
    }

    // === Impressions ===

    /// Gain `floor(followers × rate)` impressions, multiplied while in
    /// monster mode. Returns the amount gained; never negative.
    pub fn add_impression(&mut self, rate: f64, events: &mut EventQueue) -> i64 {
        let base = (self.state.followers as f64 * rate).floor();
        let scaled = if self.state.is_monster_mode {
            (base * self.monster_impression_multiplier).floor()
        } else {
            base
        };
        let gained = if scaled.is_finite() && scaled > 0.0 { scaled as i64 } else { 0 };

        self.state.impressions = self.state.impressions.saturating_add(gained);
        self.emit_impressions(events);
        gained
    }

    // === Mental ===

    /// Subtract mental, clamping at 0.
    ///
    /// Latches monster mode the first time mental crosses the threshold
    /// downward without hitting 0.
    pub fn damage_mental(&mut self, amount: i32, events: &mut EventQueue) -> MentalOutcome {
        if amount <= 0 {
            return MentalOutcome::Unchanged;
        }

        let before = self.state.mental;
        self.state.mental = before.saturating_sub(amount).max(0);
        self.emit_mental(events);

        let after = self.state.mental;
        if after == 0 {
            tracing::info!(before, "mental depleted");
            return MentalOutcome::Depleted;
        }
        if !self.state.is_monster_mode
            && before > self.monster_threshold
            && after <= self.monster_threshold
        {
            self.state.is_monster_mode = true;
            tracing::info!(mental = after, threshold = self.monster_threshold, "monster mode latched");
            events.push(GameEvent::MonsterModeTriggered { mental: after });
            return MentalOutcome::MonsterTriggered;
        }
        MentalOutcome::Changed
    }

    /// Add mental, clamping at the maximum. Returns the applied amount.
    pub fn heal_mental(&mut self, amount: i32, events: &mut EventQueue) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.state.mental;
        self.state.mental = before.saturating_add(amount).min(self.state.max_mental);
        self.emit_mental(events);
        self.state.mental - before
    }

    // === Motivation ===

    /// Spend motivation iff enough is available. No mutation on failure.
    pub fn use_motivation(&mut self, cost: i32, events: &mut EventQueue) -> bool {
        let cost = cost.max(0);
        if self.state.motivation < cost {
            return false;
        }
        self.state.motivation -= cost;
        self.emit_motivation(events);
        true
    }

    /// Recover motivation up to the current maximum.
    pub fn add_motivation(&mut self, amount: i32, events: &mut EventQueue) {
        self.state.motivation = self
            .state
            .motivation
            .saturating_add(amount)
            .clamp(0, self.state.max_motivation);
        self.emit_motivation(events);
    }

    /// Set a new maximum and refill to it.
    pub fn reset_motivation(&mut self, max: i32, events: &mut EventQueue) {
        self.state.max_motivation = max.max(0);
        self.state.motivation = self.state.max_motivation;
        self.emit_motivation(events);
    }

    // === Flaming ===

    pub fn add_flaming_seeds(&mut self, seeds: u32, events: &mut EventQueue) {
        self.state.flaming_seeds = self.state.flaming_seeds.saturating_add(seeds);
        self.emit_flaming(events);
    }

    /// Remove and return every seed.
    pub fn take_flaming_seeds(&mut self, events: &mut EventQueue) -> u32 {
        let seeds = std::mem::take(&mut self.state.flaming_seeds);
        self.emit_flaming(events);
        seeds
    }

    /// Bernoulli trial against `probability`; on success the account
    /// catches fire. Returns whether it fired.
    pub fn try_trigger_flaming(
        &mut self,
        probability: f64,
        rng: &mut GameRng,
        events: &mut EventQueue,
    ) -> bool {
        let fired = rng.roll(probability);
        if fired {
            self.ignite(events);
        }
        fired
    }

    /// Unconditionally set on fire and bump the level.
    pub fn ignite(&mut self, events: &mut EventQueue) {
        self.state.is_on_fire = true;
        self.state.flaming_level = self.state.flaming_level.saturating_add(1);
        tracing::debug!(level = self.state.flaming_level, "flaming");
        self.emit_flaming(events);
    }

    /// Return the current level and reset it (and the fire) to zero.
    /// Damage is applied by the caller.
    pub fn consume_flaming_level(&mut self, events: &mut EventQueue) -> u32 {
        let level = std::mem::take(&mut self.state.flaming_level);
        self.state.is_on_fire = false;
        self.emit_flaming(events);
        level
    }

    // === Emission ===

    fn emit_followers(&self, events: &mut EventQueue) {
        events.push(GameEvent::FollowersChanged { followers: self.state.followers });
    }

    fn emit_mental(&self, events: &mut EventQueue) {
        events.push(GameEvent::MentalChanged {
            mental: self.state.mental,
            max: self.state.max_mental,
        });
    }

    fn emit_motivation(&self, events: &mut EventQueue) {
        events.push(GameEvent::MotivationChanged {
            motivation: self.state.motivation,
            max: self.state.max_motivation,
        });
    }

    fn emit_impressions(&self, events: &mut EventQueue) {
        events.push(GameEvent::ImpressionsChanged { impressions: self.state.impressions });
    }

    fn emit_flaming(&self, events: &mut EventQueue) {
        events.push(GameEvent::FlamingChanged {
            seeds: self.state.flaming_seeds,
            level: self.state.flaming_level,
            on_fire: self.state.is_on_fire,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(max: i32, threshold: i32) -> (ResourceLedger, EventQueue) {
        let settings = GameSettings::default().with_mental(max, threshold).with_followers(100);
        (ResourceLedger::new(&settings), EventQueue::new())
    }

    #[test]
    fn test_initial_state() {
        let (ledger, _) = ledger(10, 3);
        assert_eq!(ledger.followers(), 100);
        assert_eq!(ledger.mental(), 10);
        assert_eq!(ledger.motivation(), 3);
        assert_eq!(ledger.impressions(), 0);
        assert!(!ledger.is_monster_mode());
    }

    #[test]
    fn test_followers_clamp_at_zero() {
        let (mut ledger, mut events) = ledger(10, 3);
        assert_eq!(ledger.add_followers(-250, &mut events), -100);
        assert_eq!(ledger.followers(), 0);
        assert_eq!(events.drain(), vec![GameEvent::FollowersChanged { followers: 0 }]);
    }

    #[test]
    fn test_add_impression_floors() {
        let (mut ledger, mut events) = ledger(10, 3);
        assert_eq!(ledger.add_impression(0.255, &mut events), 25);
        assert_eq!(ledger.impressions(), 25);
        // Negative rates never reduce impressions
        assert_eq!(ledger.add_impression(-1.0, &mut events), 0);
        assert_eq!(ledger.impressions(), 25);
    }

    #[test]
    fn test_monster_threshold_scenario() {
        let (mut ledger, mut events) = ledger(10, 3);

        assert_eq!(ledger.damage_mental(8, &mut events), MentalOutcome::MonsterTriggered);
        assert_eq!(ledger.mental(), 2);
        assert!(ledger.is_monster_mode());
        assert!(events.iter().any(|e| matches!(e, GameEvent::MonsterModeTriggered { mental: 2 })));

        ledger.heal_mental((ledger.mental() + 1) / 2, &mut events);
        assert_eq!(ledger.mental(), 3);
    }

    #[test]
    fn test_monster_latches_once() {
        let (mut ledger, mut events) = ledger(10, 3);
        assert_eq!(ledger.damage_mental(7, &mut events), MentalOutcome::MonsterTriggered);
        ledger.heal_mental(10, &mut events);
        assert_eq!(ledger.damage_mental(7, &mut events), MentalOutcome::Changed);

        let triggers = events
            .iter()
            .filter(|e| matches!(e, GameEvent::MonsterModeTriggered { .. }))
            .count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn test_monster_impression_multiplier() {
        let (mut ledger, mut events) = ledger(10, 3);
        ledger.damage_mental(7, &mut events);
        assert_eq!(ledger.add_impression(1.0, &mut events), 200);
    }

    #[test]
    fn test_depletion_is_not_monster() {
        let (mut ledger, mut events) = ledger(10, 3);
        assert_eq!(ledger.damage_mental(50, &mut events), MentalOutcome::Depleted);
        assert_eq!(ledger.mental(), 0);
        assert!(!ledger.is_monster_mode());
        assert!(ledger.is_depleted());
    }

    #[test]
    fn test_heal_clamps() {
        let (mut ledger, mut events) = ledger(10, 3);
        ledger.damage_mental(2, &mut events);
        assert_eq!(ledger.heal_mental(5, &mut events), 2);
        assert_eq!(ledger.mental(), 10);
    }

    #[test]
    fn test_use_motivation() {
        let (mut ledger, mut events) = ledger(10, 3);
        assert!(ledger.use_motivation(2, &mut events));
        assert_eq!(ledger.motivation(), 1);

        events.clear();
        assert!(!ledger.use_motivation(2, &mut events));
        assert_eq!(ledger.motivation(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_motivation_reset_and_clamp() {
        let (mut ledger, mut events) = ledger(10, 3);
        ledger.reset_motivation(5, &mut events);
        assert_eq!(ledger.motivation(), 5);
        ledger.add_motivation(10, &mut events);
        assert_eq!(ledger.motivation(), 5);
        ledger.add_motivation(-10, &mut events);
        assert_eq!(ledger.motivation(), 0);
    }

    #[test]
    fn test_flaming_cycle() {
        let (mut ledger, mut events) = ledger(10, 3);
        let mut rng = GameRng::new(1);

        ledger.add_flaming_seeds(3, &mut events);
        assert!(!ledger.try_trigger_flaming(0.0, &mut rng, &mut events));
        assert!(ledger.try_trigger_flaming(1.0, &mut rng, &mut events));
        assert!(ledger.try_trigger_flaming(1.0, &mut rng, &mut events));
        assert!(ledger.state().is_on_fire);

        assert_eq!(ledger.consume_flaming_level(&mut events), 2);
        assert_eq!(ledger.state().flaming_level, 0);
        assert!(!ledger.state().is_on_fire);
        assert_eq!(ledger.take_flaming_seeds(&mut events), 3);
        assert_eq!(ledger.state().flaming_seeds, 0);
    }
}
