//! Turn phase state machine.
//!
//! ```text
//! Idle -> StartStep -> PlayerAction -> EndStep -> { StartStep | Result }
//!                      (any active phase) -> GameOver
//! ```
//!
//! Transitions requested from the wrong phase are silent no-ops that
//! return `false`.

use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, GameEvent};

/// Phase of the turn loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No stage running.
    #[default]
    Idle,
    StartStep,
    PlayerAction,
    EndStep,
    /// Turn limit reached.
    Result,
    /// Mental depleted.
    GameOver,
}

impl Phase {
    /// Result and GameOver end the session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Result | Phase::GameOver)
    }

    /// A stage is running and not finished.
    #[must_use]
    pub fn is_active(self) -> bool {
        !self.is_terminal() && self != Phase::Idle
    }
}

/// Bonuses granted by cards that outlive the turn they were played in.
/// Reset only when a new stage starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnModifiers {
    pub extra_draws_per_turn: u32,
    pub max_motivation_bonus: i32,
}

/// What finishing an end step led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAdvance {
    NextTurn(u32),
    Finished,
    /// Not in EndStep.
    Ignored,
}

/// Owns phase, turn counter and persistent modifiers.
#[derive(Clone, Debug, Default)]
pub struct TurnPhaseController {
    phase: Phase,
    turn_count: u32,
    turn_limit: u32,
    modifiers: TurnModifiers,
}

impl TurnPhaseController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub fn turn_limit(&self) -> u32 {
        self.turn_limit
    }

    #[must_use]
    pub fn modifiers(&self) -> TurnModifiers {
        self.modifiers
    }

    pub fn add_extra_draws(&mut self, extra: u32) {
        self.modifiers.extra_draws_per_turn = self.modifiers.extra_draws_per_turn.saturating_add(extra);
    }

    pub fn add_max_motivation_bonus(&mut self, bonus: i32) {
        self.modifiers.max_motivation_bonus = self.modifiers.max_motivation_bonus.saturating_add(bonus);
    }

    /// Start turn 1 of a fresh stage. Clears modifiers.
    pub fn begin_session(&mut self, turn_limit: u32, events: &mut EventQueue) {
        *self = Self {
            phase: Phase::Idle,
            turn_count: 1,
            turn_limit: turn_limit.max(1),
            modifiers: TurnModifiers::default(),
        };
        self.enter_start_step(events);
    }

    /// Back to Idle with everything cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_phase(&mut self, phase: Phase, events: &mut EventQueue) {
        self.phase = phase;
        events.push(GameEvent::PhaseChanged { phase });
    }

    fn enter_start_step(&mut self, events: &mut EventQueue) {
        self.set_phase(Phase::StartStep, events);
        events.push(GameEvent::TurnStarted { turn: self.turn_count });
        events.push(GameEvent::TurnChanged { turn: self.turn_count });
        tracing::debug!(turn = self.turn_count, "turn start");
    }

    /// StartStep -> PlayerAction. Needs no player input.
    pub fn advance_to_player_action(&mut self, events: &mut EventQueue) -> bool {
        if self.phase != Phase::StartStep {
            return false;
        }
        self.set_phase(Phase::PlayerAction, events);
        true
    }

    /// PlayerAction -> EndStep.
    pub fn end_player_action(&mut self, events: &mut EventQueue) -> bool {
        if self.phase != Phase::PlayerAction {
            return false;
        }
        self.set_phase(Phase::EndStep, events);
        events.push(GameEvent::TurnEnded { turn: self.turn_count });
        tracing::debug!(turn = self.turn_count, "turn end");
        true
    }

    /// EndStep -> StartStep of the next turn, or Result past the limit.
    pub fn finish_end_step(&mut self, events: &mut EventQueue) -> TurnAdvance {
        if self.phase != Phase::EndStep {
            return TurnAdvance::Ignored;
        }
        self.turn_count += 1;
        if self.turn_count > self.turn_limit {
            self.set_phase(Phase::Result, events);
            return TurnAdvance::Finished;
        }
        self.enter_start_step(events);
        TurnAdvance::NextTurn(self.turn_count)
    }

    /// Any active phase -> GameOver.
    pub fn game_over(&mut self, events: &mut EventQueue) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.set_phase(Phase::GameOver, events);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_turn_cycle() {
        let mut events = EventQueue::new();
        let mut phases = TurnPhaseController::new();
        phases.begin_session(2, &mut events);

        assert_eq!(phases.phase(), Phase::StartStep);
        assert_eq!(phases.turn(), 1);
        assert!(phases.advance_to_player_action(&mut events));
        assert!(phases.end_player_action(&mut events));
        assert_eq!(phases.finish_end_step(&mut events), TurnAdvance::NextTurn(2));

        assert!(phases.advance_to_player_action(&mut events));
        assert!(phases.end_player_action(&mut events));
        assert_eq!(phases.finish_end_step(&mut events), TurnAdvance::Finished);
        assert_eq!(phases.phase(), Phase::Result);
        assert_eq!(phases.turn(), 3);
    }

    #[test]
    fn test_start_step_events() {
        let mut events = EventQueue::new();
        let mut phases = TurnPhaseController::new();
        phases.begin_session(5, &mut events);

        assert_eq!(
            events.drain(),
            vec![
                GameEvent::PhaseChanged { phase: Phase::StartStep },
                GameEvent::TurnStarted { turn: 1 },
                GameEvent::TurnChanged { turn: 1 },
            ]
        );
    }

    #[test]
    fn test_wrong_phase_is_noop() {
        let mut events = EventQueue::new();
        let mut phases = TurnPhaseController::new();

        assert!(!phases.end_player_action(&mut events));
        assert!(!phases.game_over(&mut events));

        phases.begin_session(5, &mut events);
        events.clear();
        assert!(!phases.end_player_action(&mut events));
        assert_eq!(phases.finish_end_step(&mut events), TurnAdvance::Ignored);
        assert!(events.is_empty());
        assert_eq!(phases.phase(), Phase::StartStep);
    }

    #[test]
    fn test_terminal_phases_are_final() {
        let mut events = EventQueue::new();
        let mut phases = TurnPhaseController::new();
        phases.begin_session(5, &mut events);
        phases.advance_to_player_action(&mut events);

        assert!(phases.game_over(&mut events));
        assert!(phases.phase().is_terminal());
        assert!(!phases.game_over(&mut events));
        assert!(!phases.end_player_action(&mut events));
        assert!(!phases.advance_to_player_action(&mut events));
    }

    #[test]
    fn test_modifiers_reset_on_new_session() {
        let mut events = EventQueue::new();
        let mut phases = TurnPhaseController::new();
        phases.begin_session(5, &mut events);
        phases.add_extra_draws(2);
        phases.add_max_motivation_bonus(1);
        assert_eq!(phases.modifiers().extra_draws_per_turn, 2);

        phases.begin_session(5, &mut events);
        assert_eq!(phases.modifiers(), TurnModifiers::default());
    }
}
