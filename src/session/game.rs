//! The game session: one stage being played.
//!
//! `GameSession` owns every subsystem and is the only thing the presentation
//! talks to. It never calls out; state changes are reported through the
//! event queue and blocking prompts through `pending()`.
//!
//! ## Turn flow
//!
//! ```text
//! start_stage ─► StartStep ─► PlayerAction ─► end_player_action
//!                   ▲                              │
//!                   │     discard hand, evaluate quota, apply damage
//!                   │                              │
//!                   │   [quota failed ack] ─► [monster cut-in ─► monster draft]
//!                   │                              │
//!                   │                   [regular draft, if quota met]
//!                   └──────────── next turn ◄──────┴──► Result
//! ```
//!
//! Mental reaching 0 anywhere goes straight to GameOver.

use std::collections::VecDeque;
use std::fmt;

use crate::cards::CardId;
use crate::core::{
    ContentError, GameRng, GameRngState, PlayRejection, ProgressSnapshot, ProgressStore,
    StageDefinition, StoreError, ValidatedContent,
};
use crate::draft::{DraftKind, DraftSelector};
use crate::effects::{EffectResolver, PlayContext, PlayFollowup, PlayGate, PlayOutcome};
use crate::events::{EventQueue, GameEvent};
use crate::resources::{MentalOutcome, ResourceLedger};
use crate::rules::{
    Acknowledgment, AcknowledgmentKind, MonsterModeController, Phase, QuotaEvaluator,
    QuotaOutcome, TurnAdvance, TurnPhaseController,
};
use crate::zones::DeckEngine;

use super::command::{Command, CommandOutcome};
use super::view::{DraftOffer, PendingInteraction, SessionView};

/// Where the end step picks up after an interaction resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EndStage {
    QuotaNotice,
    MonsterCutIn,
    MonsterDraft,
    RegularDraft,
    Advance,
}

/// What to do once the pending interaction is dismissed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    /// Mid-turn monster draft: play simply continues.
    PlayerAction,
    EndStep(EndStage),
}

/// A running (or finished) stage.
///
/// ## Usage
///
/// ```
/// use influence_deck::cards::{CardId, CardTemplate, ImpressionGain};
/// use influence_deck::core::{ContentBundle, GameSettings, StageDefinition};
/// use influence_deck::rules::Phase;
/// use influence_deck::session::GameSession;
///
/// let post = CardId::new(1);
/// let content = ContentBundle {
///     settings: GameSettings::default(),
///     cards: vec![CardTemplate::new(post, "Post").with_impressions(ImpressionGain::Rate(1.0))],
///     stages: vec![StageDefinition::new("intro", vec![post; 8])],
/// }
/// .validate()
/// .unwrap();
///
/// let mut session = GameSession::new(content, 42);
/// session.start_stage("intro").unwrap();
/// assert_eq!(session.phase(), Phase::PlayerAction);
///
/// session.try_play_card(post).unwrap();
/// assert_eq!(session.ledger().impressions(), 10);
/// ```
pub struct GameSession {
    content: ValidatedContent,
    stage: Option<StageDefinition>,

    ledger: ResourceLedger,
    deck: DeckEngine,
    drafts: DraftSelector,
    quota: QuotaEvaluator,
    monster: MonsterModeController,
    phases: TurnPhaseController,
    rng: GameRng,
    events: EventQueue,

    pending: Option<PendingInteraction>,
    resume: Resume,
    turn_outcome: Option<QuotaOutcome>,
    is_drawing: bool,

    commands: VecDeque<Command>,
    progress: ProgressSnapshot,
    store: Option<Box<dyn ProgressStore>>,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("stage", &self.stage_id())
            .field("phase", &self.phases.phase())
            .field("turn", &self.phases.turn())
            .field("resources", self.ledger.state())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Idle session over validated content.
    #[must_use]
    pub fn new(content: ValidatedContent, seed: u64) -> Self {
        let ledger = ResourceLedger::new(content.settings());
        Self {
            content,
            stage: None,
            ledger,
            deck: DeckEngine::new(),
            drafts: DraftSelector::new(),
            quota: QuotaEvaluator::default(),
            monster: MonsterModeController::new(),
            phases: TurnPhaseController::new(),
            rng: GameRng::new(seed),
            events: EventQueue::new(),
            pending: None,
            resume: Resume::PlayerAction,
            turn_outcome: None,
            is_drawing: false,
            commands: VecDeque::new(),
            progress: ProgressSnapshot::default(),
            store: None,
        }
    }

    /// Attach a progress store and load what it holds.
    pub fn with_store(mut self, store: impl ProgressStore + 'static) -> Result<Self, StoreError> {
        self.progress = store.load()?;
        self.store = Some(Box::new(store));
        Ok(self)
    }

    // === Inspection ===

    #[must_use]
    pub fn content(&self) -> &ValidatedContent {
        &self.content
    }

    #[must_use]
    pub fn stage_id(&self) -> Option<&str> {
        self.stage.as_ref().map(|s| s.id.as_str())
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phases.phase()
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.phases.turn()
    }

    #[must_use]
    pub fn phases(&self) -> &TurnPhaseController {
        &self.phases
    }

    #[must_use]
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    #[must_use]
    pub fn deck(&self) -> &DeckEngine {
        &self.deck
    }

    #[must_use]
    pub fn quota(&self) -> &QuotaEvaluator {
        &self.quota
    }

    #[must_use]
    pub fn drafts(&self) -> &DraftSelector {
        &self.drafts
    }

    #[must_use]
    pub fn monster(&self) -> &MonsterModeController {
        &self.monster
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingInteraction> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressSnapshot {
        &self.progress
    }

    #[must_use]
    pub fn store(&self) -> Option<&dyn ProgressStore> {
        self.store.as_deref()
    }

    /// RNG checkpoint, e.g. for replays.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            stage_id: self.stage_id().map(str::to_string),
            phase: self.phases.phase(),
            turn: self.phases.turn(),
            turn_limit: self.phases.turn_limit(),
            resources: self.ledger.state().clone(),
            quota: self.quota.state().current_turn_quota,
            gained_this_turn: self.quota.gained(&self.ledger),
            modifiers: self.phases.modifiers(),
            hand: self.deck.hand().to_vec(),
            draw_count: self.deck.len(crate::zones::Pile::Draw),
            discard_count: self.deck.len(crate::zones::Pile::Discard),
            exhausted_count: self.deck.exhausted_count(),
            is_drawing: self.is_drawing,
            pending: self.pending.clone(),
        }
    }

    // === Lifecycle ===

    /// Start (or restart) a stage from turn 1.
    pub fn start_stage(&mut self, stage_id: &str) -> Result<(), ContentError> {
        let content = self.content.clone();
        let stage = content
            .stage(stage_id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownStage(stage_id.to_string()))?;
        let settings = content.settings();

        self.clear_play_state();
        self.ledger = ResourceLedger::new(settings);
        self.deck.initialize(&stage.initial_deck, &mut self.rng);
        self.quota = QuotaEvaluator::new(stage.quota_table.clone(), settings);

        let turn_limit = stage.turn_limit.unwrap_or(settings.turn_limit);
        tracing::info!(
            stage = %stage.id,
            turn_limit,
            deck = stage.initial_deck.len(),
            seed = self.rng.seed(),
            "stage started"
        );
        self.stage = Some(stage);

        self.ledger.emit_all(&mut self.events);
        self.events.push(self.deck.changed_event());
        self.phases.begin_session(turn_limit, &mut self.events);
        self.run_start_step();
        Ok(())
    }

    /// Drop the current stage and return to Idle. Progress is kept.
    pub fn reset(&mut self) {
        self.clear_play_state();
        self.ledger = ResourceLedger::new(self.content.settings());
        self.deck = DeckEngine::new();
        self.quota = QuotaEvaluator::default();
        self.stage = None;
        self.commands.clear();
        self.events.clear();
        tracing::debug!("session reset");
    }

    fn clear_play_state(&mut self) {
        self.phases.reset();
        self.drafts.clear_history();
        self.monster = MonsterModeController::new();
        self.pending = None;
        self.resume = Resume::PlayerAction;
        self.turn_outcome = None;
        self.is_drawing = false;
    }

    // === Player actions ===

    /// Play a card from hand. See `EffectResolver` for the gates and the
    /// resolution order.
    pub fn try_play_card(&mut self, card: CardId) -> Result<PlayOutcome, PlayRejection> {
        let gate = PlayGate {
            drawing: self.is_drawing,
            awaiting_draft: matches!(self.pending, Some(PendingInteraction::Draft(_))),
            awaiting_acknowledgment: matches!(
                self.pending,
                Some(PendingInteraction::Acknowledgment(_))
            ),
        };

        let mut ctx = PlayContext {
            catalog: self.content.catalog(),
            ledger: &mut self.ledger,
            deck: &mut self.deck,
            phases: &mut self.phases,
            monster: &mut self.monster,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        let outcome = EffectResolver::try_play_card(&mut ctx, gate, card)?;

        match outcome.followup {
            PlayFollowup::GameOver => self.enter_game_over(),
            PlayFollowup::MonsterDraft => {
                if !self.offer_monster_draft(Resume::PlayerAction) {
                    self.events.push(GameEvent::CardResolved { card });
                }
            }
            PlayFollowup::Resolved => {}
        }
        Ok(outcome)
    }

    /// Close the action phase and run the end step. False (and nothing
    /// changes) outside PlayerAction or while an interaction is pending.
    pub fn end_player_action(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        if !self.phases.end_player_action(&mut self.events) {
            return false;
        }

        self.deck.discard_hand();
        self.events.push(self.deck.changed_event());

        let turn = self.phases.turn();
        let outcome = self.quota.evaluate_end_of_turn(turn, &mut self.ledger, &mut self.events);
        match outcome.mental {
            MentalOutcome::Depleted => {
                self.enter_game_over();
                return true;
            }
            MentalOutcome::MonsterTriggered => {
                self.monster.activate(&mut self.ledger, &mut self.events);
            }
            MentalOutcome::Changed | MentalOutcome::Unchanged => {}
        }

        self.turn_outcome = Some(outcome);
        self.continue_end_step(EndStage::QuotaNotice);
        true
    }

    /// Dismiss the pending acknowledgment and resume.
    pub fn acknowledge(&mut self) -> bool {
        if !matches!(self.pending, Some(PendingInteraction::Acknowledgment(_))) {
            return false;
        }
        self.pending = None;
        self.resume_flow();
        true
    }

    /// Take option `index` of the pending draft.
    pub fn select_draft_option(&mut self, index: usize) -> bool {
        let (kind, card) = match &self.pending {
            Some(PendingInteraction::Draft(offer)) => match offer.options.get(index) {
                Some(&card) => (offer.kind, card),
                None => return false,
            },
            _ => return false,
        };
        self.pending = None;

        match kind {
            DraftKind::Regular => self.drafts.select_card(card, &mut self.deck),
            DraftKind::Monster => self.monster.complete_draft(card, &mut self.deck),
        }
        tracing::info!(%card, ?kind, "draft card selected");
        self.events.push(GameEvent::DraftResolved { kind, card: Some(card) });
        self.events.push(self.deck.changed_event());

        self.resume_flow();
        true
    }

    /// Decline a regular draft. Monster drafts cannot be skipped.
    pub fn skip_draft(&mut self) -> bool {
        match &self.pending {
            Some(PendingInteraction::Draft(offer)) if offer.is_skippable() => {}
            _ => return false,
        }
        self.pending = None;
        self.events.push(GameEvent::DraftResolved { kind: DraftKind::Regular, card: None });
        self.resume_flow();
        true
    }

    /// The presentation started animating a draw; plays are refused until
    /// `complete_draw_animation`.
    pub fn begin_draw_animation(&mut self) -> bool {
        if !self.phases.phase().is_active() || self.is_drawing {
            return false;
        }
        self.is_drawing = true;
        true
    }

    pub fn complete_draw_animation(&mut self) -> bool {
        std::mem::take(&mut self.is_drawing)
    }

    // === Command queue ===

    /// Queue a command for `process_commands`.
    pub fn submit(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    #[must_use]
    pub fn queued_commands(&self) -> usize {
        self.commands.len()
    }

    /// Run queued commands in order, each to completion.
    pub fn process_commands(&mut self) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::with_capacity(self.commands.len());
        while let Some(command) = self.commands.pop_front() {
            let reset = command == Command::Reset;
            outcomes.push(self.execute(command));
            if reset {
                break;
            }
        }
        outcomes
    }

    /// Run one command immediately.
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        tracing::trace!(?command, "execute");
        match command {
            Command::StartStage(id) => match self.start_stage(&id) {
                Ok(()) => CommandOutcome::Applied,
                Err(err) => CommandOutcome::Failed(err.to_string()),
            },
            Command::PlayCard(card) => match self.try_play_card(card) {
                Ok(outcome) => CommandOutcome::Played(outcome),
                Err(rejection) => CommandOutcome::Rejected(rejection),
            },
            Command::EndPlayerAction => CommandOutcome::from_flag(self.end_player_action()),
            Command::Acknowledge => CommandOutcome::from_flag(self.acknowledge()),
            Command::SelectDraftOption(index) => {
                CommandOutcome::from_flag(self.select_draft_option(index))
            }
            Command::SkipDraft => CommandOutcome::from_flag(self.skip_draft()),
            Command::BeginDrawAnimation => CommandOutcome::from_flag(self.begin_draw_animation()),
            Command::CompleteDrawAnimation => {
                CommandOutcome::from_flag(self.complete_draw_animation())
            }
            Command::Reset => {
                self.reset();
                CommandOutcome::Applied
            }
        }
    }

    // === Turn flow ===

    fn run_start_step(&mut self) {
        let settings = self.content.settings();
        let turn = self.phases.turn();
        let modifiers = self.phases.modifiers();

        self.quota.begin_turn(turn, &self.ledger, &mut self.events);
        self.ledger.reset_motivation(
            settings.max_motivation.saturating_add(modifiers.max_motivation_bonus),
            &mut self.events,
        );

        let count = settings.hand_size.saturating_add(modifiers.extra_draws_per_turn);
        let report = self.deck.draw_cards(count, &mut self.rng);
        if report.reshuffled > 0 {
            self.events.push(GameEvent::Reshuffled { moved: report.reshuffled });
        }
        self.events.push(self.deck.changed_event());

        self.phases.advance_to_player_action(&mut self.events);
    }

    fn resume_flow(&mut self) {
        match self.resume {
            Resume::PlayerAction => {}
            Resume::EndStep(stage) => self.continue_end_step(stage),
        }
    }

    /// Walk the end step from `stage` until something needs the player or
    /// the turn advances.
    fn continue_end_step(&mut self, mut stage: EndStage) {
        loop {
            match stage {
                EndStage::QuotaNotice => {
                    stage = EndStage::MonsterCutIn;
                    if let Some(outcome) = self.turn_outcome.filter(|o| o.penalty > 0) {
                        let ack = Acknowledgment::quota_failed(
                            outcome.gained,
                            outcome.quota,
                            outcome.total_damage(),
                        );
                        self.await_acknowledgment(ack, Resume::EndStep(stage));
                        return;
                    }
                }
                EndStage::MonsterCutIn => {
                    stage = EndStage::RegularDraft;
                    if self.monster.take_activation() && self.monster.needs_draft() {
                        let ack = Acknowledgment::preset(AcknowledgmentKind::MonsterCutIn);
                        self.await_acknowledgment(ack, Resume::EndStep(EndStage::MonsterDraft));
                        return;
                    }
                }
                EndStage::MonsterDraft => {
                    stage = EndStage::RegularDraft;
                    if self.offer_monster_draft(Resume::EndStep(stage)) {
                        return;
                    }
                }
                EndStage::RegularDraft => {
                    stage = EndStage::Advance;
                    // The last turn goes straight to Result.
                    let last_turn = self.phases.turn() >= self.phases.turn_limit();
                    let met = self.turn_outcome.is_some_and(|o| o.met);
                    if met && !last_turn && self.offer_regular_draft(Resume::EndStep(stage)) {
                        return;
                    }
                }
                EndStage::Advance => {
                    self.turn_outcome = None;
                    match self.phases.finish_end_step(&mut self.events) {
                        TurnAdvance::NextTurn(_) => self.run_start_step(),
                        TurnAdvance::Finished => self.enter_result(),
                        TurnAdvance::Ignored => {}
                    }
                    return;
                }
            }
        }
    }

    fn await_acknowledgment(&mut self, ack: Acknowledgment, resume: Resume) {
        tracing::debug!(kind = ?ack.kind, "awaiting acknowledgment");
        self.events.push(GameEvent::ShowAcknowledgment { ack: ack.clone() });
        self.pending = Some(PendingInteraction::Acknowledgment(ack));
        self.resume = resume;
    }

    fn await_draft(&mut self, offer: DraftOffer, resume: Resume) {
        self.events.push(GameEvent::DraftOffered {
            kind: offer.kind,
            options: offer.options.to_vec(),
        });
        self.pending = Some(PendingInteraction::Draft(offer));
        self.resume = resume;
    }

    /// Offer the whole monster pool. An empty pool settles the draft at once
    /// and returns false.
    fn offer_monster_draft(&mut self, resume: Resume) -> bool {
        let pool = self.stage.as_ref().map(|s| s.monster_pool.as_slice()).unwrap_or_default();
        let options = self.drafts.generate_monster_draft_options(pool);
        if options.is_empty() {
            self.monster.forgo_draft();
            self.events.push(GameEvent::DraftResolved { kind: DraftKind::Monster, card: None });
            return false;
        }
        tracing::info!(options = options.len(), "monster draft offered");
        self.await_draft(DraftOffer { kind: DraftKind::Monster, options }, resume);
        true
    }

    /// Offer a tier-weighted draft from the stage pool. False if nothing
    /// could be offered.
    fn offer_regular_draft(&mut self, resume: Resume) -> bool {
        let Some(stage) = self.stage.as_ref() else {
            return false;
        };
        if stage.draft_pool.is_empty() {
            return false;
        }
        let options = self.drafts.generate_draft_options(
            &stage.draft_pool,
            self.content.catalog(),
            &stage.probability_table,
            self.ledger.impressions(),
            self.content.settings().draft_slot_count,
            &mut self.rng,
        );
        if options.is_empty() {
            return false;
        }
        self.await_draft(DraftOffer { kind: DraftKind::Regular, options }, resume);
        true
    }

    // === Terminal ===

    fn enter_game_over(&mut self) {
        if !self.phases.game_over(&mut self.events) {
            return;
        }
        self.pending = None;
        self.turn_outcome = None;
        self.is_drawing = false;

        let turn = self.phases.turn();
        let impressions = self.ledger.impressions();
        tracing::info!(turn, impressions, "game over");
        self.events.push(GameEvent::GameOver { turn, impressions });
        self.record_progress(false);
    }

    fn enter_result(&mut self) {
        let impressions = self.ledger.impressions();
        let stage = self.stage_id().unwrap_or_default().to_string();
        tracing::info!(stage = %stage, impressions, "stage cleared");
        self.events.push(GameEvent::StageResult { stage, impressions, cleared: true });
        self.record_progress(true);
    }

    fn record_progress(&mut self, cleared: bool) {
        let Some(stage) = self.stage.as_ref() else {
            return;
        };
        let score = self.ledger.impressions();
        if self.progress.record(&stage.id, score, cleared) {
            tracing::info!(stage = %stage.id, score, "new high score");
        }
        if let Some(store) = self.store.as_mut() {
            if let Err(err) = store.save(&self.progress) {
                tracing::warn!(error = %err, "failed to save progress");
            }
        }
    }
}
